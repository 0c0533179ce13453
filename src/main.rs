//! # Vellum CLI
//!
//! Usage:
//!   vellum scene.json -o ops.json
//!   echo '{ ... }' | vellum -o ops.json
//!   vellum --example > scene.json
//!
//! Set `RUST_LOG=debug` to see layout and compositing decisions.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_scene_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).unwrap_or_else(|e| fail(&format!("Failed to read {}: {}", args[1], e)))
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            fail(&format!("Failed to read stdin: {}", e));
        }
        buf
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "ops.json".to_string());

    let list = match vellum::render_json(&input) {
        Ok(list) => list,
        Err(e) => fail(&format!("Failed to render scene: {}", e)),
    };

    let json = match serde_json::to_string_pretty(&list) {
        Ok(json) => json,
        Err(e) => fail(&format!("Failed to serialize display list: {}", e)),
    };
    if let Err(e) = fs::write(&output_path, &json) {
        fail(&format!("Failed to write {}: {}", output_path, e));
    }
    eprintln!("✓ Written {} ops to {}", list.ops().len(), output_path);
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {}", message);
    process::exit(1);
}

fn example_scene_json() -> &'static str {
    r##"{
  "settings": {
    "width": 400,
    "height": 300,
    "defaultStyle": { "fontFamily": "Helvetica", "fontSize": 12 }
  },
  "children": [
    {
      "kind": { "type": "Layer" },
      "id": "map",
      "children": [
        {
          "kind": { "type": "Rect", "x": 20, "y": 20, "width": 360, "height": 260 },
          "clipMask": true
        },
        {
          "kind": { "type": "Rect", "x": 0, "y": 0, "width": 400, "height": 300 },
          "style": { "fillColor": { "r": 0.95, "g": 0.94, "b": 0.9 } }
        },
        {
          "kind": { "type": "Group" },
          "id": "main-road",
          "merge": { "kind": "Linear", "autoMerge": true },
          "children": [
            {
              "kind": { "type": "Rect", "x": 0, "y": 140, "width": 400, "height": 14 },
              "style": { "fillColor": { "r": 0.5, "g": 0.5, "b": 0.5 } }
            },
            {
              "kind": { "type": "Rect", "x": 0, "y": 142, "width": 400, "height": 10 },
              "style": { "fillColor": { "r": 1, "g": 0.85, "b": 0.4 } }
            }
          ]
        },
        {
          "kind": { "type": "Group" },
          "id": "side-road",
          "merge": { "kind": "Linear", "autoMerge": true },
          "children": [
            {
              "kind": { "type": "Rect", "x": 190, "y": 0, "width": 12, "height": 300 },
              "style": { "fillColor": { "r": 0.5, "g": 0.5, "b": 0.5 } }
            },
            {
              "kind": { "type": "Rect", "x": 192, "y": 0, "width": 8, "height": 300 },
              "style": { "fillColor": { "r": 1, "g": 1, "b": 1 } }
            }
          ]
        }
      ]
    },
    {
      "kind": { "type": "Layer" },
      "id": "labels",
      "children": [
        {
          "kind": {
            "type": "AreaText",
            "rectangle": { "x": 30, "y": 30, "width": 140, "height": 60 },
            "content": "Harbour district\nFerry terminal and market halls",
            "verticalAlign": "top"
          },
          "style": {
            "fontSize": 11,
            "leading": 14,
            "shadowColor": { "r": 1, "g": 1, "b": 1, "a": 0.8 }
          }
        },
        {
          "kind": {
            "type": "AreaText",
            "rectangle": { "x": 230, "y": 220, "width": 140, "height": 40 },
            "content": "Old Town",
            "verticalAlign": "bottom"
          },
          "style": { "fontSize": 14, "fontWeight": 700, "justification": "right" }
        }
      ]
    }
  ]
}
"##
}
