#![allow(dead_code)]

pub mod fixtures {
    use serde_json::{json, Value};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Header template carrying every header marker.
    pub fn header_template(name: &str) -> String {
        format!(
            "#pragma once\n\
             #include \"modules/module.hpp\"\n\
             \n\
             __startNamespace__;\n\
             \n\
             __classDeclaration__\n\
             {{\n\
             \x20 public:\n\
             \x20 void run{name}();\n\
             }};\n\
             \n\
             __endNamespace__;\n"
        )
    }

    /// Source template carrying every source marker.
    pub fn source_template(name: &str) -> String {
        format!(
            "#include \"{name}.hpp\"\n\
             \n\
             __startNamespace__;\n\
             \n\
             void {name}::run{name}() {{}}\n\
             \n\
             __endNamespace__;\n"
        )
    }

    pub const VARIABLE_TEMPLATE: &str = "#pragma once\n\
        \n\
        namespace korali\n\
        {\n\
        class Variable\n\
        {\n\
        \x20 public:\n\
        \x20 __variableDeclarationList__\n\
        \x20 __variableConfiguration__\n\
        };\n\
        } //korali\n";

    /// Minimal module description with the given settings.
    pub fn module_config(name: &str, settings: Value) -> Value {
        json!({
            "Module Data": {
                "Class Name": name,
                "Namespace": ["korali"]
            },
            "Configuration Settings": settings
        })
    }

    /// A temporary module source tree.
    pub struct ModuleTree {
        dir: TempDir,
    }

    impl ModuleTree {
        pub fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn path(&self, relative: &str) -> PathBuf {
            self.dir.path().join(relative)
        }

        pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
            let path = self.path(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
            path
        }

        /// `<dir>/<name>.config` plus marker-complete `._hpp`/`._cpp`.
        pub fn add_module(&self, dir: &str, name: &str, config: &Value) {
            self.add_module_raw(dir, name, &serde_json::to_string_pretty(config).unwrap());
        }

        /// Like [`add_module`](Self::add_module) with verbatim config text.
        pub fn add_module_raw(&self, dir: &str, name: &str, config: &str) {
            self.write(&format!("{dir}/{name}.config"), config);
            self.write(&format!("{dir}/{name}._hpp"), &header_template(name));
            self.write(&format!("{dir}/{name}._cpp"), &source_template(name));
        }

        pub fn add_variable_template(&self) -> PathBuf {
            self.write("variable/variable._hpp", VARIABLE_TEMPLATE)
        }

        pub fn exists(&self, relative: &str) -> bool {
            self.path(relative).exists()
        }

        pub fn read(&self, relative: &str) -> String {
            fs::read_to_string(self.path(relative)).unwrap()
        }
    }
}
