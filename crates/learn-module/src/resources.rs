//! Resource list filtering and grouping.

use crate::models::{Resource, ResourceKind};

/// Searchable view over a module's static resources.
///
/// The list itself never changes; favorites are the only mutable state.
#[derive(Debug, Clone, Default)]
pub struct ResourceLibrary {
    resources: Vec<Resource>,
    favorites: Vec<String>,
}

impl ResourceLibrary {
    /// Wrap a module's resource list.
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            favorites: Vec::new(),
        }
    }

    /// All resources.
    pub fn all(&self) -> &[Resource] {
        &self.resources
    }

    /// Flip a resource's favorite state. Returns whether it is now set.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if let Some(pos) = self.favorites.iter().position(|f| f == id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(id.to_string());
            true
        }
    }

    /// Whether a resource is marked favorite.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    /// Distinct kinds present, in first-seen order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds = Vec::new();
        for resource in &self.resources {
            if !kinds.contains(&resource.kind) {
                kinds.push(resource.kind);
            }
        }
        kinds
    }

    /// Filter by free-text term (title/description, case-insensitive) and
    /// optionally by kind. An empty term matches everything.
    pub fn filter(&self, term: &str, kind: Option<ResourceKind>) -> Vec<&Resource> {
        let term = term.to_lowercase();
        self.resources
            .iter()
            .filter(|r| {
                let matches_term = r.title.to_lowercase().contains(&term)
                    || r.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term));
                let matches_kind = kind.map_or(true, |k| r.kind == k);
                matches_term && matches_kind
            })
            .collect()
    }

    /// Filtered resources grouped by kind, in first-seen kind order.
    pub fn filter_grouped(
        &self,
        term: &str,
        kind: Option<ResourceKind>,
    ) -> Vec<(ResourceKind, Vec<&Resource>)> {
        let mut groups: Vec<(ResourceKind, Vec<&Resource>)> = Vec::new();
        for resource in self.filter(term, kind) {
            match groups.iter_mut().find(|(k, _)| *k == resource.kind) {
                Some((_, members)) => members.push(resource),
                None => groups.push((resource.kind, vec![resource])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str, title: &str, kind: ResourceKind, desc: Option<&str>) -> Resource {
        Resource {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            url: format!("https://example.com/{id}"),
            description: desc.map(str::to_string),
            size: None,
        }
    }

    fn library() -> ResourceLibrary {
        ResourceLibrary::new(vec![
            resource("r1", "Course Slides", ResourceKind::Pdf, None),
            resource("r2", "Intro Video", ResourceKind::Video, Some("getting started")),
            resource("r3", "Cheat Sheet", ResourceKind::Pdf, Some("quick reference")),
            resource("r4", "Docs", ResourceKind::Link, None),
        ])
    }

    #[test]
    fn test_filter_by_term_and_kind() {
        let lib = library();
        assert_eq!(lib.filter("", None).len(), 4);
        assert_eq!(lib.filter("sheet", None).len(), 1);
        assert_eq!(lib.filter("", Some(ResourceKind::Pdf)).len(), 2);
        assert_eq!(lib.filter("reference", Some(ResourceKind::Pdf)).len(), 1);
        assert_eq!(lib.filter("reference", Some(ResourceKind::Video)).len(), 0);
    }

    #[test]
    fn test_filter_matches_description() {
        let lib = library();
        let hits = lib.filter("getting STARTED", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "r2");
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let lib = library();
        let groups = lib.filter_grouped("", None);
        let kinds: Vec<ResourceKind> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::Pdf, ResourceKind::Video, ResourceKind::Link]
        );
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_favorites_toggle() {
        let mut lib = library();
        assert!(lib.toggle_favorite("r1"));
        assert!(lib.is_favorite("r1"));
        assert!(!lib.toggle_favorite("r1"));
        assert!(!lib.is_favorite("r1"));
    }

    #[test]
    fn test_kinds_distinct() {
        let lib = library();
        assert_eq!(
            lib.kinds(),
            vec![ResourceKind::Pdf, ResourceKind::Video, ResourceKind::Link]
        );
    }
}
