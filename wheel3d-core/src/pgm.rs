//! Netpbm greyscale (PGM) decoder for plain (P2) and raw (P5) files
use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_till},
    character::complete::{multispace1, u32 as decimal},
    combinator::{map, recognize, value},
    multi::{count, many0_count},
    sequence::{pair, preceded},
    IResult,
};
use thiserror::Error;

use crate::texture::Bitmap;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PgmError {
    #[error("malformed PGM data: {0}")]
    Syntax(String),
    #[error("invalid PGM header: {width}x{height}, maxval {maxval}")]
    InvalidHeader { width: u32, height: u32, maxval: u32 },
    #[error("sample {value} exceeds maxval {maxval}")]
    SampleOutOfRange { value: u32, maxval: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Encoding {
    Plain,
    Raw,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    encoding: Encoding,
    width: u32,
    height: u32,
    maxval: u32,
}

/// Decode a PGM image into an 8-bit bitmap, rescaling samples by `maxval`
pub fn parse_pgm(data: &[u8]) -> Result<Bitmap, PgmError> {
    let (rest, header) =
        parse_header(data).map_err(|e| PgmError::Syntax(format!("header: {:?}", e)))?;

    let invalid = PgmError::InvalidHeader {
        width: header.width,
        height: header.height,
        maxval: header.maxval,
    };
    if header.width == 0 || header.height == 0 || header.maxval == 0 || header.maxval > 65535 {
        return Err(invalid);
    }

    let bytes_per_sample = if header.maxval < 256 { 1 } else { 2 };
    let (texel_count, raster_len) = (header.width as usize)
        .checked_mul(header.height as usize)
        .and_then(|n| Some((n, n.checked_mul(bytes_per_sample)?)))
        .ok_or(invalid)?;

    let samples = match header.encoding {
        Encoding::Plain => parse_plain_samples(rest, texel_count),
        Encoding::Raw => parse_raw_samples(rest, raster_len, bytes_per_sample),
    }
    .map(|(_, samples)| samples)
    .map_err(|e| PgmError::Syntax(format!("samples: {:?}", e)))?;

    let mut texels = Vec::with_capacity(samples.len());
    for value in samples {
        if value > header.maxval {
            return Err(PgmError::SampleOutOfRange {
                value,
                maxval: header.maxval,
            });
        }
        texels.push((value * 255 / header.maxval) as u8);
    }

    Bitmap::new(header.width as usize, header.height as usize, texels).ok_or(
        PgmError::InvalidHeader {
            width: header.width,
            height: header.height,
            maxval: header.maxval,
        },
    )
}

/// Whitespace and `#` comments, in any mix
fn separator(input: &[u8]) -> IResult<&[u8], ()> {
    value(
        (),
        many0_count(alt((
            multispace1,
            recognize(pair(tag("#"), take_till(|c| c == b'\n'))),
        ))),
    )(input)
}

fn field(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(separator, decimal)(input)
}

fn parse_header(input: &[u8]) -> IResult<&[u8], Header> {
    let (input, encoding) = alt((
        value(Encoding::Plain, tag("P2")),
        value(Encoding::Raw, tag("P5")),
    ))(input)?;
    let (input, width) = field(input)?;
    let (input, height) = field(input)?;
    let (input, maxval) = field(input)?;
    Ok((
        input,
        Header {
            encoding,
            width,
            height,
            maxval,
        },
    ))
}

fn parse_plain_samples(input: &[u8], texels: usize) -> IResult<&[u8], Vec<u32>> {
    count(field, texels)(input)
}

fn parse_raw_samples(
    input: &[u8],
    raster_len: usize,
    bytes_per_sample: usize,
) -> IResult<&[u8], Vec<u32>> {
    // Exactly one whitespace byte separates the header from the raster
    let (input, _) = take(1usize)(input)?;
    map(take(raster_len), move |raster: &[u8]| {
        if bytes_per_sample == 1 {
            raster.iter().map(|&b| b as u32).collect()
        } else {
            raster
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) as u32)
                .collect()
        }
    })(input)
}
