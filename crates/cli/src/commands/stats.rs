use std::path::Path;

use crate::{read_dict, OutputFormat};

/// The four counters the reference viewer displays for a loaded case.
pub(crate) fn cmd_stats(file: &Path, output: OutputFormat, quiet: bool) {
    let text = read_dict(file, output, quiet);
    let dict = hexdict_core::parse(&text);

    let faces = dict.face_count();
    match output {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "vertices": dict.vertices.len(),
                "edges": dict.edges.len(),
                "faces": faces,
                "blocks": dict.blocks.len(),
            });
            let pretty = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            println!("vertices: {}", dict.vertices.len());
            println!("edges: {}", dict.edges.len());
            println!("faces: {}", faces);
            println!("blocks: {}", dict.blocks.len());
        }
    }
}
