// Mirrors static/ into dist/ so the page can be deployed as-is.
use std::{fs, io, path::Path};

fn copy_dir(src: &Path, dst: &Path) -> io::Result<u64> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if path.is_dir() {
            copied += copy_dir(&path, &dst_path)?;
        } else {
            fs::copy(&path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }
    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    if let Err(e) = copy_dir(static_dir, out_dir) {
        println!("cargo:warning=could not mirror static/ into dist/: {e}");
    }
}
