//! Collision-free naming.

use tracing::debug;

use metahub_core::error::AppError;
use metahub_core::ltree::{Label, LabelPath};
use metahub_core::result::AppResult;
use metahub_database::{CatalogTransaction, ItemRepository};

use super::HierarchyEngine;

/// Split a display name into stem and extension at the last `.`.
///
/// The extension keeps its dot. A leading dot does not start an extension,
/// so `.env` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

impl HierarchyEngine {
    /// Return `name` if no item with it exists at (`path`, `archived`),
    /// otherwise the first free `<stem>_<n><ext>`.
    ///
    /// Every candidate is checked against the store inside the caller's
    /// transaction.
    pub async fn available_name(
        &self,
        tx: &mut dyn CatalogTransaction,
        container_code: &str,
        zone: i32,
        name: &Label,
        path: Option<&LabelPath>,
        archived: bool,
    ) -> AppResult<Label> {
        if tx
            .find_by_exact_path(container_code, zone, path, name, archived)
            .await?
            .is_none()
        {
            return Ok(name.clone());
        }

        let shown = name.decode()?;
        let (stem, extension) = split_extension(&shown);
        for n in 1..=self.max_name_attempts {
            let candidate = Label::encode(&format!("{stem}_{n}{extension}"));
            if tx
                .find_by_exact_path(container_code, zone, path, &candidate, archived)
                .await?
                .is_none()
            {
                debug!(original = %shown, attempt = n, "Resolved name collision");
                return Ok(candidate);
            }
        }

        Err(AppError::conflict(format!(
            "No free name for '{shown}' after {} attempts",
            self.max_name_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("folder"), ("folder", ""));
        assert_eq!(split_extension(".env"), (".env", ""));
        assert_eq!(split_extension("trailing."), ("trailing", "."));
    }
}
