//! The user's choices for a single scaffolding run

use crate::error::{Result, ScaffoldError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported frameworks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// React on Vite
    React,
    /// Next.js
    #[value(name = "nextjs", alias = "next")]
    NextJs,
}

impl Framework {
    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::React => "React (Vite)",
            Framework::NextJs => "Next.js",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Optional features, in the order they are provisioned.
///
/// The derived `Ord` follows declaration order, which is the canonical
/// provisioning order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Feature {
    #[serde(rename = "tailwind")]
    Tailwind,
    #[serde(rename = "eslintPrettier")]
    #[value(name = "eslint-prettier", alias = "lint")]
    LintFormat,
    #[serde(rename = "husky")]
    #[value(name = "husky", alias = "git-hooks")]
    GitHooks,
    #[serde(rename = "testing")]
    Testing,
    #[serde(rename = "storybook")]
    Storybook,
    #[serde(rename = "i18n")]
    #[value(name = "i18n")]
    I18n,
    #[serde(rename = "auth")]
    Auth,
}

impl Feature {
    /// All features in declaration order
    pub const ALL: [Feature; 7] = [
        Feature::Tailwind,
        Feature::LintFormat,
        Feature::GitHooks,
        Feature::Testing,
        Feature::Storybook,
        Feature::I18n,
        Feature::Auth,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::Tailwind => "Tailwind CSS",
            Feature::LintFormat => "ESLint + Prettier",
            Feature::GitHooks => "Husky + lint-staged",
            Feature::Testing => "Testing",
            Feature::Storybook => "Storybook",
            Feature::I18n => "Internationalization (i18n)",
            Feature::Auth => "Authentication (NextAuth)",
        }
    }

    /// Short hint shown next to the feature in the prompt
    pub fn hint(&self) -> &'static str {
        match self {
            Feature::Tailwind => "uses a dedicated template",
            Feature::LintFormat => "",
            Feature::GitHooks => "pre-commit lint-staged hook",
            Feature::Testing => "Vitest for React, Jest for Next.js",
            Feature::Storybook => "runs the Storybook initializer",
            Feature::I18n => "",
            Feature::Auth => "",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Answers collected from the prompt layer. Persisted as `config.cli.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAnswers")]
pub struct Answers {
    project_name: String,
    framework: Framework,
    features: Vec<Feature>,
}

/// Unchecked form read from JSON; converted through [`Answers::new`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnswers {
    project_name: String,
    framework: Framework,
    #[serde(default)]
    features: Vec<Feature>,
}

impl TryFrom<RawAnswers> for Answers {
    type Error = ScaffoldError;

    fn try_from(raw: RawAnswers) -> Result<Self> {
        Answers::new(raw.project_name, raw.framework, raw.features)
    }
}

impl Answers {
    /// Build answers; the project name must not be blank
    pub fn new(
        project_name: impl Into<String>,
        framework: Framework,
        features: Vec<Feature>,
    ) -> Result<Self> {
        let project_name = project_name.into().trim().to_string();
        if project_name.is_empty() {
            return Err(ScaffoldError::Config(
                "project name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            project_name,
            framework,
            features,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn framework(&self) -> Framework {
        self.framework
    }

    /// Features in the order they were selected
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Whether the styling add-on template variant is wanted
    pub fn wants_styling_addon(&self) -> bool {
        self.has(Feature::Tailwind)
    }

    /// Pretty-printed JSON written to `config.cli.json`
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| ScaffoldError::Json {
            path: crate::ANSWERS_FILE.into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_project_name_rejected() {
        assert!(Answers::new("   ", Framework::React, vec![]).is_err());
        assert!(Answers::new("", Framework::NextJs, vec![]).is_err());
    }

    #[test]
    fn test_project_name_is_trimmed() {
        let answers = Answers::new("  demo ", Framework::React, vec![]).unwrap();
        assert_eq!(answers.project_name(), "demo");
    }

    #[test]
    fn test_json_shape() {
        let answers = Answers::new(
            "demo2",
            Framework::React,
            vec![Feature::Tailwind, Feature::LintFormat],
        )
        .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&answers.to_pretty_json().unwrap()).unwrap();

        assert_eq!(value["projectName"], "demo2");
        assert_eq!(value["framework"], "react");
        assert_eq!(
            value["features"],
            serde_json::json!(["tailwind", "eslintPrettier"])
        );
    }

    #[test]
    fn test_json_goes_through_validation() {
        let blank = r#"{"projectName": "  ", "framework": "react", "features": []}"#;
        let err = serde_json::from_str::<Answers>(blank).unwrap_err();
        assert!(err.to_string().contains("project name must not be empty"));

        let padded = r#"{"projectName": " demo ", "framework": "nextjs"}"#;
        let answers: Answers = serde_json::from_str(padded).unwrap();
        assert_eq!(answers.project_name(), "demo");
        assert_eq!(answers.framework(), Framework::NextJs);
        assert!(answers.features().is_empty());
    }

    #[test]
    fn test_declaration_order_is_ord() {
        let mut features = vec![Feature::Auth, Feature::Testing, Feature::LintFormat];
        features.sort();
        assert_eq!(
            features,
            vec![Feature::LintFormat, Feature::Testing, Feature::Auth]
        );

        let mut all = Feature::ALL.to_vec();
        all.reverse();
        all.sort();
        assert_eq!(all, Feature::ALL.to_vec());
    }

    #[test]
    fn test_styling_addon_follows_tailwind() {
        let plain = Answers::new("a", Framework::NextJs, vec![Feature::Auth]).unwrap();
        let styled = Answers::new("a", Framework::NextJs, vec![Feature::Tailwind]).unwrap();
        assert!(!plain.wants_styling_addon());
        assert!(styled.wants_styling_addon());
    }

    #[test]
    fn test_cli_value_names() {
        assert_eq!(
            Framework::from_str("nextjs", true).unwrap(),
            Framework::NextJs
        );
        assert_eq!(
            Feature::from_str("lint", true).unwrap(),
            Feature::LintFormat
        );
        assert_eq!(
            Feature::from_str("git-hooks", true).unwrap(),
            Feature::GitHooks
        );
    }
}
