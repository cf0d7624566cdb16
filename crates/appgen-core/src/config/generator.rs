//! Contents of the configuration files written into new projects

use crate::answers::Framework;
use crate::runtime::PackageManager;
use serde_json::{json, Value};

/// `.eslintrc.json` body; the React rule set or the Next.js one
pub fn eslintrc(framework: Framework) -> Value {
    let (framework_rules, settings) = match framework {
        Framework::NextJs => ("next/core-web-vitals", json!({})),
        Framework::React => (
            "plugin:react/recommended",
            json!({ "react": { "version": "detect" } }),
        ),
    };

    json!({
        "extends": ["eslint:recommended", framework_rules, "prettier"],
        "plugins": ["react", "react-hooks"],
        "parserOptions": { "ecmaVersion": "latest", "sourceType": "module" },
        "settings": settings,
    })
}

/// `.prettierrc` body
pub fn prettierrc() -> Value {
    json!({ "semi": true, "singleQuote": false })
}

pub const PRETTIER_IGNORE: &str = "node_modules\n.next\ndist\nbuild\n";

/// `lint-staged` block merged into `package.json`
pub fn lint_staged() -> Value {
    json!({ "*.{js,jsx,ts,tsx}": ["eslint --fix", "prettier --write"] })
}

/// `.husky/pre-commit` script
pub fn pre_commit_hook(package_manager: PackageManager) -> String {
    format!(
        "#!/bin/sh\n. \"$(dirname \"$0\")/_/husky.sh\"\n{}\n",
        package_manager.exec_line("lint-staged")
    )
}

pub const VITEST_CONFIG: &str = "import { defineConfig } from 'vitest/config'
export default defineConfig({ test: { environment: 'jsdom' } })
";

pub const JEST_CONFIG: &str = "/** @type {import('jest').Config} */
const config = {
  testEnvironment: 'jsdom',
  setupFilesAfterEnv: ['<rootDir>/jest.setup.js'],
};
module.exports = config;
";

pub const JEST_SETUP: &str = "import '@testing-library/jest-dom'\n";

/// Pretty JSON with a trailing newline
pub fn to_json_text(value: &Value) -> String {
    // Serializing a Value cannot fail
    let mut text = serde_json::to_string_pretty(value).unwrap_or_default();
    text.push('\n');
    text
}
