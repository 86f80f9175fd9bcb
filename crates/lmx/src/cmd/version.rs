use lmx_codec::{HEADER_SIZE, MARKER, RESERVED_OVERHEAD};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("lmx {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: lmx");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("wire_marker: {}", MARKER.escape_ascii());
    println!("wire_header_size: {HEADER_SIZE}");
    println!("reserved_overhead: {RESERVED_OVERHEAD}");
    println!("wire_byte_order: little-endian");
    println!(
        "build_target: {}",
        option_env!("LMX_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("LMX_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!(
        "target_endian: {}",
        option_env!("LMX_TARGET_ENDIAN").unwrap_or("unknown")
    );

    Ok(SUCCESS)
}
