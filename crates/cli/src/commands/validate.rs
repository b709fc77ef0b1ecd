use std::path::Path;
use std::process;

use crate::{read_dict, OutputFormat};

/// Parse then validate. The "critical enough to block downstream use"
/// policy lives here, not in the core: any diagnostic from either pass,
/// or a model without vertices, fails the run.
pub(crate) fn cmd_validate(file: &Path, output: OutputFormat, quiet: bool) {
    let text = read_dict(file, output, quiet);
    let dict = hexdict_core::parse(&text);
    let validation = hexdict_core::validate(&dict);

    let ok = dict.diagnostics.is_empty() && validation.is_empty() && !dict.vertices.is_empty();

    match output {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "ok": ok,
                "parseDiagnostics": dict.diagnostics,
                "validationDiagnostics": validation,
            });
            let pretty = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for diagnostic in &dict.diagnostics {
                println!("{}", diagnostic);
            }
            for message in &validation {
                println!("{}", message);
            }
            if dict.vertices.is_empty() && dict.diagnostics.is_empty() {
                println!("no vertices found");
            }
            if ok && !quiet {
                println!("{}: ok", file.display());
            }
        }
    }

    if !ok {
        process::exit(1);
    }
}
