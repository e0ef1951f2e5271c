//! Directory links to index documents.

use rustc_hash::FxHashSet;

use crate::core::{LinkError, PathValue};

/// Point a virtual directory link at its index document.
///
/// A link that already names a known document is left alone. Otherwise each
/// name of `index_files` is tried in order. Non-virtual links are unchanged.
///
/// # Errors
///
/// [`LinkError::AboveVirtualRoot`] when the link climbs above `~`.
pub fn transform_target_directory(
    link: &PathValue,
    documents: &FxHashSet<PathValue>,
    index_files: &[String],
) -> Result<PathValue, LinkError> {
    if !link.is_virtual() {
        return Ok(link.clone());
    }
    if documents.contains(&link.resolve_dots(0)?) {
        return Ok(link.clone());
    }
    for index in index_files {
        let candidate = link.append_segment(index).resolve_dots(0)?;
        if documents.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Ok(link.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathValue {
        PathValue::parse(s)
    }

    fn documents() -> FxHashSet<PathValue> {
        ["~/Repo1/README.md", "~/Repo1/Project/README.md", "~/Repo1/Project/index.md"]
            .into_iter()
            .map(p)
            .collect()
    }

    fn index() -> Vec<String> {
        vec!["README.md".to_string()]
    }

    #[test]
    fn test_directory_resolves_to_index() {
        let resolved = transform_target_directory(&p("~/Repo1/Project"), &documents(), &index());
        assert_eq!(resolved.unwrap(), p("~/Repo1/Project/README.md"));
    }

    #[test]
    fn test_index_files_in_order() {
        let names = vec!["index.md".to_string(), "README.md".to_string()];
        let resolved = transform_target_directory(&p("~/Repo1/Project"), &documents(), &names);
        assert_eq!(resolved.unwrap(), p("~/Repo1/Project/index.md"));
    }

    #[test]
    fn test_known_document_unchanged() {
        let link = p("~/Repo1/README.md");
        assert_eq!(
            transform_target_directory(&link, &documents(), &index()).unwrap(),
            link
        );
    }

    #[test]
    fn test_unknown_directory_unchanged() {
        let link = p("~/Repo1/Missing");
        assert_eq!(
            transform_target_directory(&link, &documents(), &index()).unwrap(),
            link
        );
    }

    #[test]
    fn test_non_virtual_unchanged() {
        for link in ["/in/Stack/Repo1/Project", "https://github.com/Org/Repo1", "C:/x", "Project"] {
            let link = p(link);
            assert_eq!(
                transform_target_directory(&link, &documents(), &index()).unwrap(),
                link
            );
        }
    }

    #[test]
    fn test_escape_above_virtual_root() {
        let err = transform_target_directory(&p("~/../OutsideRepo"), &documents(), &index());
        assert!(matches!(err, Err(LinkError::AboveVirtualRoot(_))));
    }
}
