//! Settings for the class a program compiles into.

/// Names baked into the generated class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Internal name of the generated class; also the output file stem.
    pub class_name: String,
    /// Internal name of the superclass.
    pub super_class: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            class_name: "MyClass".to_string(),
            super_class: "java/lang/Object".to_string(),
        }
    }
}

impl ModuleConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the class name.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// File name the class is conventionally written to.
    #[must_use]
    pub fn file_name(&self) -> String {
        let simple = self
            .class_name
            .rsplit('/')
            .next()
            .unwrap_or(&self.class_name);
        format!("{simple}.class")
    }
}
