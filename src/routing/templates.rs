//! Template route table.
//!
//! Maps presented paths to template files with an ordered regex table.
//! Unlike content routing this is first-match in declaration order, not
//! longest-prefix; the two policies are deliberately distinct.

use regex::Regex;

use crate::config::store::DomainTables;

/// One compiled template route.
#[derive(Debug, Clone)]
pub struct TemplateRoute {
    pub pattern: Regex,
    pub template: String,
}

impl TemplateRoute {
    pub fn compile(pattern: &str, template: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            template: template.to_string(),
        })
    }
}

impl DomainTables {
    /// Template path for a presented path, or `None` when no route matches
    /// and the caller should fall back to the configured default.
    pub fn template_for(&self, path: &str) -> Option<&str> {
        self.templates
            .iter()
            .find(|route| route.pattern.is_match(path))
            .map(|route| route.template.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_declared_match_wins() {
        let tables = DomainTables {
            templates: vec![
                TemplateRoute::compile("^/api/", "reference.html").unwrap(),
                TemplateRoute::compile("^/api/v2/", "reference-v2.html").unwrap(),
            ],
            ..DomainTables::default()
        };

        assert_eq!(tables.template_for("/api/v2/users"), Some("reference.html"));
        assert_eq!(tables.template_for("/guide/"), None);
    }
}
