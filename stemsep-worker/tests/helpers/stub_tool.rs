//! Stub separation tool
//!
//! Shell scripts that stand in for the external separation tool. Each
//! stub understands the real argument contract
//! (`--two-stems=vocals [--mp3 ...] --out <dir> <input>`) far enough to
//! emulate one tool behavior.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable script into `dir` and return its path
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Argument parsing common to all stubs: extracts `--out` and the final
/// positional input path, derives the filename stem
const PARSE_ARGS: &str = r#"
out=""
prev=""
input=""
for a in "$@"; do
  if [ "$prev" = "--out" ]; then out="$a"; fi
  prev="$a"
  input="$a"
done
stem=$(basename "$input")
stem="${stem%.*}"
"#;

/// Stub that copies the input to a given layout template under `--out`.
///
/// `layout` is a relative path with `{stem}` substituted by the stub,
/// e.g. `htdemucs/{stem}/vocals.wav`.
pub fn copying_stub(dir: &Path, layout: &str) -> PathBuf {
    let body = format!(
        "#!/bin/sh\n{PARSE_ARGS}\nrel=$(printf '%s' '{layout}' | sed \"s/{{stem}}/$stem/\")\nmkdir -p \"$out/$(dirname \"$rel\")\"\ncp \"$input\" \"$out/$rel\"\necho \"separated $stem\"\n"
    );
    write_script(dir, "stub-separator", &body)
}

/// Stub that sleeps past any reasonable test budget
pub fn hanging_stub(dir: &Path) -> PathBuf {
    write_script(dir, "stub-hang", "#!/bin/sh\nsleep 30\n")
}

/// Stub that fails with diagnostics on stderr
pub fn failing_stub(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "stub-fail",
        "#!/bin/sh\necho 'loading model' \necho 'model checkpoint missing' >&2\nexit 2\n",
    )
}

/// Stub that records each invocation by appending to a marker file,
/// then produces nothing
pub fn recording_stub(dir: &Path, marker: &Path) -> PathBuf {
    let body = format!("#!/bin/sh\necho invoked >> \"{}\"\n", marker.display());
    write_script(dir, "stub-record", &body)
}
