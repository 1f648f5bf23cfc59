//! Build script for locating libcuda.
//!
//! With the `cuda` feature, adds the CUDA toolkit library directories to the
//! native search path so `#[link(name = "cuda")]` resolves. Without it, does
//! nothing.
//!
//! # Environment Variables
//!
//! - `CUDA_PATH`: Path to CUDA toolkit (common locations probed if not set)

#[cfg(feature = "cuda")]
use std::env;
#[cfg(feature = "cuda")]
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CUDA_PATH");

    #[cfg(feature = "cuda")]
    {
        add_cuda_search_paths();
    }
}

#[cfg(feature = "cuda")]
fn add_cuda_search_paths() {
    // lib64/stubs carries a libcuda for machines without a driver installed.
    let roots: Vec<PathBuf> = match env::var("CUDA_PATH") {
        Ok(cuda_path) => vec![PathBuf::from(cuda_path)],
        Err(_) => ["/usr/local/cuda", "/opt/cuda"]
            .iter()
            .map(PathBuf::from)
            .collect(),
    };

    for root in roots {
        for sub in ["lib64", "lib", "lib64/stubs", "lib/x64"] {
            let dir = root.join(sub);
            if dir.exists() {
                println!("cargo:rustc-link-search=native={}", dir.display());
            }
        }
    }
}
