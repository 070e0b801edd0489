//! Drives a full pass over one source text: scan, recognize, transform, emit.

use crate::config::{CreflectConfig, OutputFormat};
use crate::declaration::parse_enum;
use crate::emitter::{ReflectedEnum, render_json, write_c_table};
use crate::error::Result;
use crate::flags::FlagChain;
use crate::scanner::{Annotation, Scanner};
use std::io::Write;
use tracing::{debug, info};

/// Counts gathered during one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Annotation blocks found.
    pub annotations: usize,
    /// Tables written (or enums collected for JSON).
    pub tables: usize,
    /// Blocks whose declaration was not a recognized enum.
    pub skipped: usize,
}

pub struct Generator {
    config: CreflectConfig,
}

impl Generator {
    pub fn new(config: CreflectConfig) -> Self {
        Self { config }
    }

    /// Turns one annotation into a reflected enum. `Ok(None)` means the
    /// declaration is not an enum and the block is ignored; its flags are
    /// not looked at in that case.
    pub fn reflect(&self, annotation: &Annotation<'_>) -> Result<Option<ReflectedEnum>> {
        let Some(decl) = parse_enum(annotation.declaration) else {
            debug!(
                line = annotation.line,
                "skipping annotation: declaration is not a typedef'd enum"
            );
            return Ok(None);
        };

        let flags = FlagChain::parse(annotation.flag_spec, annotation.line)?;
        debug!(
            line = annotation.line,
            enum_name = decl.name,
            enumerators = decl.enumerators.len(),
            "reflecting enum"
        );
        Ok(Some(ReflectedEnum::new(&decl, &flags)))
    }

    /// Reflects every recognized enum in `source`, stopping at the first
    /// flag error.
    pub fn collect(&self, source: &str) -> Result<(Vec<ReflectedEnum>, GenerateSummary)> {
        let mut summary = GenerateSummary::default();
        let mut enums = Vec::new();

        for annotation in Scanner::new(source, &self.config.scan.annotation) {
            summary.annotations += 1;
            match self.reflect(&annotation)? {
                Some(reflected) => {
                    summary.tables += 1;
                    enums.push(reflected);
                }
                None => summary.skipped += 1,
            }
        }

        Ok((enums, summary))
    }

    /// Writes the generated output for `source` to `out`.
    ///
    /// In C format each table is written as soon as its annotation has been
    /// processed, so when a later annotation fails the output of earlier
    /// ones has already reached `out`.
    pub fn write_to<W: Write>(&self, source: &str, out: &mut W) -> Result<GenerateSummary> {
        let summary = match self.config.emit.format {
            OutputFormat::C => {
                let mut summary = GenerateSummary::default();
                for annotation in Scanner::new(source, &self.config.scan.annotation) {
                    summary.annotations += 1;
                    match self.reflect(&annotation)? {
                        Some(reflected) => {
                            write_c_table(out, &reflected, &self.config.emit)?;
                            summary.tables += 1;
                        }
                        None => summary.skipped += 1,
                    }
                }
                summary
            }
            OutputFormat::Json => {
                let (enums, summary) = self.collect(source)?;
                out.write_all(render_json(&enums)?.as_bytes())?;
                summary
            }
        };
        out.flush()?;

        info!(
            annotations = summary.annotations,
            tables = summary.tables,
            skipped = summary.skipped,
            "generation finished"
        );
        Ok(summary)
    }

    /// Like [`Generator::write_to`], collecting the output into a string.
    pub fn generate(&self, source: &str) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(source, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(CreflectConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CreflectError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_annotations_produce_empty_output() {
        let out = Generator::default()
            .generate("int main(void) { return 0; }\n")
            .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_generate_single_table() {
        let src = "\
#include <stdio.h>

CREFLECT((remove_prefix(FOO_)),
typedef enum {
  FOO_BAR = 3, // comment
  FOO_BAZ,
} Foo)
";
        let expected = "\
typedef enum {
  FOO_BAR = 3, // comment
  FOO_BAZ,
} Foo;
const char * Foo_str[] = {
  [FOO_BAR] = \"BAR\",
  [FOO_BAZ] = \"BAZ\",
};

";
        assert_eq!(Generator::default().generate(src).unwrap(), expected);
    }

    #[test]
    fn test_lowercase_flag() {
        let out = Generator::default()
            .generate("CREFLECT((lowercase), typedef enum { Baz } Thing)")
            .unwrap();
        assert!(out.contains("  [Baz] = \"baz\",\n"));
    }

    #[test]
    fn test_empty_flags_keep_names() {
        let out = Generator::default()
            .generate("CREFLECT((), typedef enum { Alpha, Beta, } Greek)")
            .unwrap();
        assert!(out.contains("  [Alpha] = \"Alpha\",\n  [Beta] = \"Beta\",\n};\n"));
    }

    #[test]
    fn test_non_enum_declaration_is_skipped() {
        let generator = Generator::default();
        let src = "CREFLECT((lowercase), int parse(const char *src))";
        let mut out = Vec::new();
        let summary = generator.write_to(src, &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            summary,
            GenerateSummary {
                annotations: 1,
                tables: 0,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_unknown_flag_on_non_enum_is_ignored() {
        let out = Generator::default()
            .generate("CREFLECT((unsupported_flag), int parse(void))")
            .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_unsupported_flag_keeps_earlier_output() {
        let src = "\
CREFLECT((), typedef enum { A } First)
CREFLECT((unsupported_flag), typedef enum { B } Second)
CREFLECT((), typedef enum { C } Third)
";
        let mut out = Vec::new();
        let err = Generator::default().write_to(src, &mut out).unwrap_err();
        assert!(matches!(
            err,
            CreflectError::UnsupportedFlag { ref flag, line: 2 } if flag == "unsupported_flag"
        ));

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("First_str"));
        assert!(!written.contains("Second"));
        assert!(!written.contains("Third"));
    }

    #[test]
    fn test_comma_in_flag_arguments_fails() {
        let err = Generator::default()
            .generate("CREFLECT((remove_prefix(A, B)), typedef enum { A_X } E)")
            .unwrap_err();
        assert!(matches!(
            err,
            CreflectError::UnsupportedFlag { ref flag, line: 1 } if flag == "B)"
        ));
    }

    #[test]
    fn test_multiple_tables_in_source_order() {
        let src = "\
CREFLECT((lowercase), typedef enum { ONE } Num)
struct ignored { int x; };
CREFLECT((remove_prefix(K_)), typedef enum : unsigned { K_X, K_Y } Key)
";
        let out = Generator::default().generate(src).unwrap();
        let num = out.find("Num_str").unwrap();
        let key = out.find("Key_str").unwrap();
        assert!(num < key);
        assert!(out.contains("typedef enum : unsigned { K_X, K_Y } Key;\n"));
        assert!(out.contains("  [K_Y] = \"Y\",\n"));
    }

    #[test]
    fn test_digit_separators_in_values() {
        let out = Generator::default()
            .generate("CREFLECT((), typedef enum : int { A = 1'000, B } E)\n")
            .unwrap();
        assert!(out.contains("  [A] = \"A\",\n  [B] = \"B\",\n};\n"));

        let out = Generator::default()
            .generate("CREFLECT((lowercase), typedef enum {\n  A = 1'000,\n  B,\n} E)\n")
            .unwrap();
        assert!(out.contains("  [A] = \"a\",\n  [B] = \"b\",\n};\n"));
    }

    #[test]
    fn test_json_format() {
        let mut config = CreflectConfig::default();
        config.emit.format = OutputFormat::Json;
        let out = Generator::new(config)
            .generate("CREFLECT((lowercase), typedef enum { RED, GREEN } Color)")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "Color");
        assert_eq!(value[0]["entries"][1]["display"], "green");
    }

    #[test]
    fn test_custom_annotation_name() {
        let mut config = CreflectConfig::default();
        config.scan.annotation = "REFLECT_ENUM".to_string();
        let (enums, summary) = Generator::new(config)
            .collect("CREFLECT((), typedef enum { A } Old)\nREFLECT_ENUM((), typedef enum { B } New)")
            .unwrap();
        assert_eq!(summary.annotations, 1);
        assert_eq!(enums[0].name, "New");
    }
}
