//! Default configuration values

use std::collections::BTreeMap;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "outrig.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "outrig.yaml";

/// Conventional module subdirectory
pub const DEFAULT_MODULE_DIR: &str = "IdealGraphVisualizer";

/// Shared build output root, relative to the suite root
pub const DEFAULT_OUTPUT_ROOT: &str = "IdealGraphVisualizer/application/target";

/// External build tool
pub const DEFAULT_TOOL: &str = "mvn";

/// Build commands used when a project declares none
pub const DEFAULT_BUILD_COMMANDS: &[&str] = &["package", "-DskipTests"];

/// Clean phase arguments
pub const DEFAULT_CLEAN_ARGS: &[&str] = &["clean", "--quiet"];

/// Unit test arguments
pub const DEFAULT_TEST_ARGS: &[&str] = &["package"];

/// Environment variable carrying the tool's JVM options
pub const TOOL_OPTS_VAR: &str = "MAVEN_OPTS";

/// Tool options for builds: headless graphics, no interpreter-only warning
pub const DEFAULT_BUILD_OPTS: &str =
    "-Djava.awt.headless=true -Dpolyglot.engine.WarnInterpreterOnly=false";

/// Tool options for clean: headless graphics
pub const DEFAULT_CLEAN_OPTS: &str = "-Djava.awt.headless=true";

/// Runtime queried for its version
pub const DEFAULT_RUNTIME: &str = "java";

/// Version query arguments
pub const DEFAULT_VERSION_ARGS: &[&str] = &["-version"];

/// Product launcher name
pub const DEFAULT_EXECUTABLE: &str = "idealgraphvisualizer";

/// Archive prefix for distributable outputs
pub const DEFAULT_ARCHIVE_PREFIX: &str = "igv";

/// Launcher argument that disables console logging
pub const DEFAULT_QUIET_LOGGER_ARG: &str = "-J-Dnetbeans.logger.console=false";

/// Canonical tree, relative to the suite root
pub const DEFAULT_CANONICAL_TREE: &str =
    "../compiler/src/jdk.graal.compiler/src/jdk/graal/compiler/graphio";

/// Mirrored tree, relative to the suite root
pub const DEFAULT_MIRROR_TREE: &str =
    "IdealGraphVisualizer/Data/src/main/java/jdk/graal/compiler/graphio";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".outrig.toml",
        ".outrig.yaml",
    ]
}

pub(crate) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn build_env() -> BTreeMap<String, String> {
    BTreeMap::from([(TOOL_OPTS_VAR.to_string(), DEFAULT_BUILD_OPTS.to_string())])
}

pub(crate) fn clean_env() -> BTreeMap<String, String> {
    BTreeMap::from([(TOOL_OPTS_VAR.to_string(), DEFAULT_CLEAN_OPTS.to_string())])
}

/// Template written by `outrig init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Outrig suite configuration

[suite]
root = "."
module_dir = "IdealGraphVisualizer"
output_root = "IdealGraphVisualizer/application/target"
clean_root = "IdealGraphVisualizer"

[tool]
program = "mvn"
clean_args = ["clean", "--quiet"]
test_args = ["package"]

[tool.env]
MAVEN_OPTS = "-Djava.awt.headless=true -Dpolyglot.engine.WarnInterpreterOnly=false"

[tool.clean_env]
MAVEN_OPTS = "-Djava.awt.headless=true"

[runtime]
program = "java"
version_args = ["-version"]

[product]
executable = "idealgraphvisualizer"
output_dir = "idealgraphvisualizer"
archive_prefix = "igv"

[verify]
canonical = "../compiler/src/jdk.graal.compiler/src/jdk/graal/compiler/graphio"
mirror = "IdealGraphVisualizer/Data/src/main/java/jdk/graal/compiler/graphio"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: SuiteConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = SuiteConfig::default();
        assert_eq!(config.tool.program, defaults.tool.program);
        assert_eq!(config.tool.env, defaults.tool.env);
        assert_eq!(config.tool.clean_env, defaults.tool.clean_env);
        assert_eq!(config.verify.mirror, defaults.verify.mirror);
    }

    #[test]
    fn test_build_env_sets_headless_and_interpreter_flags() {
        let env = build_env();
        let opts = &env[TOOL_OPTS_VAR];
        assert!(opts.contains("-Djava.awt.headless=true"));
        assert!(opts.contains("WarnInterpreterOnly=false"));
    }
}
