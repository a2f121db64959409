use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Component, Path},
};
use strum::{EnumString, IntoStaticStr};

#[cfg(feature = "database")]
use sea_orm::Value;

/// File extensions accepted for stored resource files
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "pdf", "zip"];

/// Represents the kind of material a resource holds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Pdf,
    Zip,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Pdf => "PDF File",
            Self::Zip => "ZIP File",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Checks that a stored file reference is relative, stays inside the media
/// root, can be sent back as a quoted download name and carries one of the
/// [`ALLOWED_EXTENSIONS`]
pub fn is_allowed_file(path: &str) -> bool {
    let printable = !path
        .chars()
        .any(|c| c.is_control() || c == '"' || c == '\\');

    let stays_inside = Path::new(path)
        .components()
        .all(|component| matches!(component, Component::Normal(_)));

    printable
        && stays_inside
        && extension(path).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type to send a stored file with
pub fn content_type_for(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("mp4") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for ResourceKind {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "ResourceKind".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<ResourceKind> for Value {
    fn from(kind: ResourceKind) -> Self {
        Value::String(Some(Box::new(kind.as_str().to_owned())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for ResourceKind {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|e| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to parse ResourceKind from {val:?}: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for ResourceKind {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(ResourceKind::from_str("video"), Ok(ResourceKind::Video));
        assert_eq!(ResourceKind::from_str("pdf"), Ok(ResourceKind::Pdf));
        assert_eq!(ResourceKind::from_str("zip"), Ok(ResourceKind::Zip));
        assert!(ResourceKind::from_str("docx").is_err());
    }

    #[test]
    fn test_kind_display_and_label() {
        assert_eq!(ResourceKind::Pdf.to_string(), "pdf");
        assert_eq!(ResourceKind::Pdf.label(), "PDF File");
        assert_eq!(ResourceKind::Zip.label(), "ZIP File");
    }

    #[test]
    fn test_allowed_files() {
        assert!(is_allowed_file("resources/2025/03/intro.mp4"));
        assert!(is_allowed_file("slides.PDF"));
        assert!(!is_allowed_file("notes.docx"));
        assert!(!is_allowed_file("no_extension"));
        assert!(!is_allowed_file("../etc/passwd.zip"));
        assert!(!is_allowed_file("/abs/path.zip"));
    }

    #[test]
    fn test_rejects_names_unfit_for_headers() {
        assert!(!is_allowed_file("a\"b.pdf"));
        assert!(!is_allowed_file("a\nb.pdf"));
        assert!(!is_allowed_file("a\rb.pdf"));
        assert!(!is_allowed_file("a\\b.pdf"));
        assert!(!is_allowed_file("tab\there.mp4"));
        assert!(is_allowed_file("semana 1/aula inicial.mp4"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("a/b.mov"), "video/quicktime");
        assert_eq!(content_type_for("a/b.zip"), "application/zip");
        assert_eq!(content_type_for("a/b"), "application/octet-stream");
    }
}
