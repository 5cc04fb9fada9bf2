//! Shared fixtures for DataFlow integration tests.

#[cfg(unix)]
use std::path::{Path, PathBuf};

/// Writes an executable shell script standing in for the generator tool
/// and returns its path. Unix only; the e2e tests are gated accordingly.
#[cfg(unix)]
pub fn write_fake_tool(dir: &Path, script_body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("uvx");
    let script = format!("#!/bin/sh\n{script_body}");
    std::fs::write(&path, script).expect("write fake tool script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake tool script");
    path
}

/// A fake tool that honors the real argument contract: writes a payload
/// JSON when `--data-out` is passed, and prints the HTML marker when
/// `--data-in` is passed. Everything else on stdout is log noise.
#[cfg(unix)]
pub const WELL_BEHAVED_TOOL: &str = r#"
data_out=""
data_in=""
meta=""
while [ $# -gt 0 ]; do
  case "$1" in
    --data-out) data_out="$2"; shift 2 ;;
    --data-in)  data_in="$2";  shift 2 ;;
    -m)         meta="$2";     shift 2 ;;
    *)          shift ;;
  esac
done
if [ -n "$data_out" ]; then
  echo "Reading metadata from $meta"
  printf '%s' '{"edges":[{"source":"raw_orders","target":"stg_orders"}],"node_types":{"raw_orders":"source","stg_orders":"model"},"stats":{"node_count":2,"edge_count":1}}' > "$data_out"
  echo "Parsed 2 nodes"
fi
if [ -n "$data_in" ]; then
  html_path="${data_in%.json}.html"
  echo "<html><body>flow</body></html>" > "$html_path"
  echo "Rendering graph..."
  echo "Successfully generated Pyvis HTML: $html_path"
fi
"#;
