/// Test data factories using builder pattern
///
/// Provides convenient methods to create dictionary terms with sensible defaults
use herbarium_lib::modules::dictionary::{Category, Definition, Reference, Term, TermService};

pub struct TermFactory {
    term: String,
    definition: String,
    category: Category,
    reference: Option<String>,
    url: Option<String>,
}

impl TermFactory {
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_string(),
            definition: format!("Test definition for {}", term),
            category: Category::General,
            reference: None,
            url: None,
        }
    }

    pub fn botanical(term: &str) -> Self {
        Self::new(term).with_category(Category::Botanical)
    }

    pub fn medical(term: &str) -> Self {
        Self::new(term).with_category(Category::Medical)
    }

    pub fn general(term: &str) -> Self {
        Self::new(term)
    }

    pub fn with_definition(mut self, definition: &str) -> Self {
        self.definition = definition.to_string();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_reference(mut self, source: &str, url: Option<&str>) -> Self {
        self.reference = Some(source.to_string());
        self.url = url.map(str::to_string);
        self
    }

    /// Unsaved draft, for exercising repositories directly
    pub fn draft(self) -> Term {
        let reference = self
            .reference
            .map(|source| Reference::new(source, self.url).expect("valid reference"));

        Term::new(
            self.term,
            Definition::new(self.definition).expect("valid definition"),
            self.category,
            reference,
        )
        .expect("valid term")
    }

    /// Create through the service so the full validation path runs
    pub async fn create(self, service: &TermService) -> Term {
        service
            .create_term(
                &self.term,
                &self.definition,
                self.category,
                self.reference.as_deref(),
                self.url.as_deref(),
            )
            .await
            .expect("Term creation should succeed")
    }
}
