use crate::types::{SavedTemplate, TemplateId};

/// Saved templates, newest first.
///
/// The list is only changed through the methods below so the ordering
/// and identity rules hold everywhere it is shown or persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateLibrary {
    templates: Vec<SavedTemplate>,
}

impl TemplateLibrary {
    /// Wraps an already ordered list.
    pub fn new(templates: Vec<SavedTemplate>) -> Self {
        Self { templates }
    }

    /// Templates in display order.
    pub fn templates(&self) -> &[SavedTemplate] {
        &self.templates
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether there are no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Looks up a template by id.
    pub fn get(&self, id: TemplateId) -> Option<&SavedTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Puts a freshly saved template at the front.
    pub fn insert_newest(&mut self, template: SavedTemplate) {
        self.templates.insert(0, template);
    }

    /// Removes the template with `id`, leaving every other entry in place.
    pub fn remove(&mut self, id: TemplateId) -> Option<SavedTemplate> {
        let index = self.templates.iter().position(|template| template.id == id)?;
        Some(self.templates.remove(index))
    }

    /// Replaces the whole list, e.g. with the rows fetched from the remote store.
    pub fn replace_all(&mut self, templates: Vec<SavedTemplate>) {
        self.templates = templates;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelConfig;

    fn template(name: &str) -> SavedTemplate {
        SavedTemplate::snapshot(name, &LabelConfig::default())
    }

    #[test]
    fn test_insert_newest_goes_first() {
        let mut library = TemplateLibrary::default();
        library.insert_newest(template("a"));
        library.insert_newest(template("b"));
        let names: Vec<&str> = library.templates().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_remove_takes_exactly_that_id() {
        let a = template("a");
        let b = template("b");
        let c = template("c");
        let mut library = TemplateLibrary::new(vec![a.clone(), b.clone(), c.clone()]);

        let removed = library.remove(b.id).unwrap();
        assert_eq!(removed.id, b.id);
        assert_eq!(library.len(), 2);
        assert!(library.get(a.id).is_some());
        assert!(library.get(b.id).is_none());
        assert!(library.get(c.id).is_some());

        assert!(library.remove(b.id).is_none());
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_replace_all() {
        let mut library = TemplateLibrary::new(vec![template("old")]);
        library.replace_all(vec![template("x"), template("y")]);
        assert_eq!(library.len(), 2);
        assert_eq!(library.templates()[0].name, "x");
        library.replace_all(Vec::new());
        assert!(library.is_empty());
    }
}
