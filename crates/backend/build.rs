//! Кладёт рядом с бинарником (target/<profile>) то, что сервер ищет при
//! старте: `config.toml` и папку `migrations/`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn copy_dir(src: &Path, dest: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(dest)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "sql") {
            if let Some(name) = path.file_name() {
                fs::copy(&path, dest.join(name))?;
                copied += 1;
            }
        }
    }
    Ok(copied)
}

fn target_profile_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    let profile = env::var("PROFILE").ok()?;
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../migrations");

    let Some(target_dir) = target_profile_dir() else {
        println!("cargo:warning=target profile directory not found, nothing copied");
        return;
    };
    let Some(workspace_root) = Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2) else {
        println!("cargo:warning=workspace root not found, nothing copied");
        return;
    };

    let config = workspace_root.join("config.toml");
    if config.exists() {
        if let Err(e) = fs::copy(&config, target_dir.join("config.toml")) {
            println!("cargo:warning=Failed to copy config.toml: {}", e);
        }
    } else {
        println!("cargo:warning=config.toml not found, the embedded default will be used");
    }

    let migrations = workspace_root.join("migrations");
    if migrations.is_dir() {
        if let Err(e) = copy_dir(&migrations, &target_dir.join("migrations")) {
            println!("cargo:warning=Failed to copy migrations: {}", e);
        }
    }
}
