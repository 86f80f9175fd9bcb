use std::fs;
use std::io::Read;

use lmx_codec::FrameBuffer;

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_encode_summary, print_raw, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;

    let mut buf = FrameBuffer::alloc(args.capacity)
        .map_err(|err| codec_error("buffer setup failed", err))?;
    let encoded = buf
        .encode(&payload)
        .map_err(|err| codec_error("encode failed", err))?;
    let wire = &buf.as_slice()[..encoded];
    let checksum = wire[3];

    tracing::debug!(
        payload = payload.len(),
        encoded,
        "payload framed"
    );

    if let Some(path) = &args.output {
        fs::write(path, wire)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
        print_encode_summary(payload.len(), encoded, checksum, format);
        return Ok(SUCCESS);
    }

    match format {
        OutputFormat::Raw => print_raw(wire),
        other => print_encode_summary(payload.len(), encoded, checksum, other),
    }
    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut payload = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut payload)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(payload)
}
