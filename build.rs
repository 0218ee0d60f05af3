use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Embed the nearest release tag so the update check can compare against
    // GitHub releases; plain CARGO_PKG_VERSION is the fallback at runtime.
    if let Some(tag) = latest_git_tag() {
        println!("cargo:rustc-env=GIT_TAG={tag}");
    }
}

fn latest_git_tag() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let tag = String::from_utf8(output.stdout).ok()?;
    let tag = tag.trim();
    (!tag.is_empty()).then(|| tag.to_string())
}
