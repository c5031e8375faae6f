//! Structured tool descriptions.
//!
//! `ToolSpec` assembles the description string an agent sees for each tool
//! from labelled parts (purpose, when to use, when not to use, examples,
//! output format) instead of one free-form sentence. The `when_not_to_use`
//! line is what keeps models from mixing up look-alike tools such as
//! `list_files` and `list_dir`.

use crate::ToolDef;

#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    /// One-sentence imperative purpose: "Append text to the end of a file".
    pub purpose: String,
    pub when_to_use: Option<String>,
    pub when_not_to_use: Option<String>,
    pub parameters: serde_json::Value,
    /// `(call, expected behaviour)` pairs.
    pub examples: Vec<(String, String)>,
    pub output_format: String,
}

impl ToolSpec {
    /// Start a spec. The parameter schema defaults to an empty object until
    /// [`parameters_for`](ToolSpecBuilder::parameters_for) is called.
    pub fn builder(name: impl Into<String>, purpose: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            spec: ToolSpec {
                name: name.into(),
                purpose: purpose.into(),
                when_to_use: None,
                when_not_to_use: None,
                parameters: serde_json::json!({"type": "object", "properties": {}}),
                examples: Vec::new(),
                output_format: "Plain text".into(),
            },
        }
    }

    pub fn to_description(&self) -> String {
        let mut desc = format!("{}.", self.purpose);
        if let Some(when) = &self.when_to_use {
            desc.push_str(&format!("\nWhen to use: {when}"));
        }
        if let Some(when_not) = &self.when_not_to_use {
            desc.push_str(&format!("\nWhen NOT to use: {when_not}"));
        }
        if !self.examples.is_empty() {
            desc.push_str("\nExamples:");
            for (input, output) in &self.examples {
                desc.push_str(&format!("\n  - {input} → {output}"));
            }
        }
        desc.push_str(&format!("\nOutput format: {}", self.output_format));
        desc
    }

    pub fn to_tool_def(&self) -> ToolDef {
        ToolDef::new(
            self.name.clone(),
            self.to_description(),
            self.parameters.clone(),
        )
    }
}

pub struct ToolSpecBuilder {
    spec: ToolSpec,
}

impl ToolSpecBuilder {
    pub fn when_to_use(mut self, when: impl Into<String>) -> Self {
        self.spec.when_to_use = Some(when.into());
        self
    }

    pub fn when_not_to_use(mut self, when_not: impl Into<String>) -> Self {
        self.spec.when_not_to_use = Some(when_not.into());
        self
    }

    /// Derive the parameter schema from the argument struct the tool
    /// deserializes into.
    pub fn parameters_for<T: schemars::JsonSchema>(mut self) -> Self {
        self.spec.parameters = crate::json_schema_for::<T>();
        self
    }

    pub fn example(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.spec.examples.push((input.into(), output.into()));
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.spec.output_format = format.into();
        self
    }

    pub fn build(self) -> ToolSpec {
        self.spec
    }

    /// Shortcut for `.build().to_tool_def()`.
    pub fn to_tool_def(self) -> ToolDef {
        self.spec.to_tool_def()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct PathArgs {
        path: String,
    }

    #[test]
    fn description_includes_guidance_sections() {
        let spec = ToolSpec::builder("list_dir", "List every entry of a directory")
            .when_to_use("When you need subdirectories as well as files")
            .when_not_to_use("When you only need files. Use list_files instead")
            .example("list_dir(path='src')", "main.rs\nutil")
            .build();

        let desc = spec.to_description();
        assert!(desc.starts_with("List every entry of a directory."));
        assert!(desc.contains("When to use:"));
        assert!(desc.contains("When NOT to use:"));
        assert!(desc.contains("list_files"));
        assert!(desc.contains("Output format: Plain text"));
    }

    #[test]
    fn optional_sections_are_omitted() {
        let desc = ToolSpec::builder("noop", "Do nothing").build().to_description();
        assert!(!desc.contains("When to use:"));
        assert!(!desc.contains("Examples:"));
    }

    #[test]
    fn parameters_for_derives_schema() {
        let def = ToolSpec::builder("read_file", "Read a file")
            .parameters_for::<PathArgs>()
            .to_tool_def();
        assert_eq!(def.function.name, "read_file");
        let required = def.function.parameters["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("path")));
    }
}
