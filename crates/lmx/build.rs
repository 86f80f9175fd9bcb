// Build provenance surfaced by `lmx version --extended`. The wire format is
// little-endian on every target, so the target's native byte order is
// recorded next to the triple.
fn main() {
    for (var, env) in [
        ("TARGET", "LMX_BUILD_TARGET"),
        ("PROFILE", "LMX_BUILD_PROFILE"),
        ("CARGO_CFG_TARGET_ENDIAN", "LMX_TARGET_ENDIAN"),
    ] {
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={env}={value}");
        }
        println!("cargo:rerun-if-env-changed={var}");
    }
}
