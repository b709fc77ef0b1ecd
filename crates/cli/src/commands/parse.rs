use std::path::Path;

use crate::{read_dict, OutputFormat};

pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    let text = read_dict(file, output, quiet);
    let dict = hexdict_core::parse(&text);

    match output {
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&dict)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            println!("scale: {}", dict.scale);
            println!("vertices: {}", dict.vertices.len());
            println!("edges: {}", dict.edges.len());
            println!("blocks: {}", dict.blocks.len());
            for patch in &dict.boundary {
                println!(
                    "patch {} (type {}): {} face(s)",
                    patch.name,
                    patch.patch_type.as_deref().unwrap_or("-"),
                    patch.faces.len()
                );
            }
            for pair in &dict.merge_patch_pairs {
                println!("merge {} -> {}", pair.master, pair.slave);
            }
            if !dict.diagnostics.is_empty() && !quiet {
                println!("diagnostics:");
                for diagnostic in &dict.diagnostics {
                    println!("  {}", diagnostic);
                }
            }
        }
    }
}
