use std::fs::File;
use std::io::Read;

use lmx_codec::{CodecError, FrameBuffer, FrameReader};

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_payload, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    if args.capacity == 0 {
        return Err(CliError::new(USAGE, "capacity must be greater than zero"));
    }

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?,
        ),
        None => Box::new(std::io::stdin().lock()),
    };

    let (frames, failures) = if args.bulk {
        decode_bulk(input, &args, format)?
    } else {
        decode_stream(input, &args, format)?
    };

    tracing::info!(frames, failures, "decode finished");
    if failures > 0 {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

/// Byte-at-a-time intake through `FrameReader`.
fn decode_stream(
    input: Box<dyn Read>,
    args: &DecodeArgs,
    format: OutputFormat,
) -> CliResult<(usize, usize)> {
    let mut reader = FrameReader::with_capacity(input, args.capacity);
    let mut frames = 0usize;
    let mut failures = 0usize;

    loop {
        if args.count.is_some_and(|limit| frames >= limit) {
            break;
        }
        match reader.read_frame() {
            Ok(payload) => {
                print_payload(frames, &payload, format);
                frames += 1;
            }
            Err(CodecError::ChecksumMismatch { expected, computed }) => {
                tracing::warn!(expected, computed, "dropping corrupt frame");
                failures += 1;
            }
            Err(CodecError::ConnectionClosed) => break,
            Err(err) => return Err(codec_error("decode failed", err)),
        }
    }
    Ok((frames, failures))
}

/// Find-then-copy intake over the whole input at once.
fn decode_bulk(
    mut input: Box<dyn Read>,
    args: &DecodeArgs,
    format: OutputFormat,
) -> CliResult<(usize, usize)> {
    let mut data = Vec::new();
    input
        .read_to_end(&mut data)
        .map_err(|err| io_error("failed reading input", err))?;

    let mut buf =
        FrameBuffer::alloc(args.capacity).map_err(|err| codec_error("buffer setup failed", err))?;
    let mut frames = 0usize;
    let mut failures = 0usize;
    let mut at = 0usize;

    while at < data.len() {
        if args.count.is_some_and(|limit| frames >= limit) {
            break;
        }
        let Some(len) = buf.decode_find(data[at]) else {
            at += 1;
            continue;
        };

        let start = at + 1;
        if data.len() - start < len {
            tracing::warn!(
                needed = len,
                available = data.len() - start,
                "stream ends inside a payload"
            );
            break;
        }
        match buf.decode_copy(&data[start..start + len]) {
            Ok(()) => {
                print_payload(frames, &buf.as_slice()[..len], format);
                frames += 1;
            }
            Err(CodecError::ChecksumMismatch { expected, computed }) => {
                tracing::warn!(expected, computed, "dropping corrupt frame");
                failures += 1;
            }
            Err(err) => return Err(codec_error("bulk copy failed", err)),
        }
        at = start + len;
    }
    Ok((frames, failures))
}
