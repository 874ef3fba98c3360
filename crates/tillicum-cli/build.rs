use vergen::EmitBuilder;

/// Emits the `VERGEN_*` variables read by `output::runtime_identity` and the
/// `info` report.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let mut emitter = EmitBuilder::builder();
    emitter.rustc_semver().cargo_target_triple().cargo_features().build_timestamp();
    emitter.emit()?;

    Ok(())
}
