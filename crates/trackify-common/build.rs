//! ---
//! tfy_section: "01-fleet-core"
//! tfy_subsection: "build"
//! tfy_type: "source"
//! tfy_scope: "build"
//! tfy_description: "Build metadata emitter for version reporting."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    EmitBuilder::builder().all_build().all_cargo().emit()?;
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
