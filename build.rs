use std::{env, fs, path::{Path, PathBuf}};

const SETTINGS_FILENAME: &str = "settings.json";

fn main() {
    println!("cargo:rerun-if-changed={SETTINGS_FILENAME}");

    // Settings are optional at runtime, so a missing file is not a build error.
    if !Path::new(SETTINGS_FILENAME).exists() {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let Some(target_dir) = out_dir.ancestors().nth(3) else {
        return;
    };

    fs::copy(SETTINGS_FILENAME, target_dir.join(SETTINGS_FILENAME))
        .expect("Failed to copy settings.json next to the binary");
}
