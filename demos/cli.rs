use clap::Parser;
use image::RgbImage;
use palette::{Srgb, cast};
use std::{fs, path::PathBuf};
use wuquant::{PaletteSize, WuRgb, quantize_into};

#[derive(Parser)]
pub struct Options {
    #[arg(short, long, default_value_t = PaletteSize::MAX, value_parser = parse_palette_size)]
    k: PaletteSize,

    #[arg(long)]
    verbose: bool,

    /// Treat the input as a file of raw interleaved RGB bytes instead of an encoded image.
    #[arg(long)]
    raw: bool,

    input: PathBuf,

    /// Write the input image remapped to the palette.
    #[arg(short, long, conflicts_with = "raw")]
    output: Option<PathBuf>,
}

fn parse_palette_size(s: &str) -> Result<PaletteSize, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn main() {
    env_logger::init();

    let Options { k, verbose, raw, input, output } = Options::parse();

    macro_rules! log {
        ($name: literal, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                println!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    if raw {
        let bytes = log!("read input", fs::read(input).unwrap());
        let mut palette = vec![0; k.as_usize() * 3];
        let len = log!("quantization", quantize_into(&bytes, k, &mut palette).unwrap());
        print_palette(cast::from_component_slice(&palette[..len * 3]));
        return;
    }

    let image = log!("read image", image::open(input).unwrap().into_rgb8());
    let (width, height) = image.dimensions();
    let wu = log!("histogram", WuRgb::run_bytes(image.as_raw()).unwrap());
    let quantized = log!("quantization", wu.quantize(k).unwrap());

    if let Some(output) = output {
        let bytes = log!(
            "remapping",
            cast::from_component_slice::<Srgb<u8>>(image.as_raw())
                .iter()
                .flat_map(|&color| {
                    let index = usize::from(quantized.palette_index(color));
                    cast::into_array(quantized.palette()[index])
                })
                .collect::<Vec<_>>()
        );
        let image = RgbImage::from_raw(width, height, bytes).unwrap();
        log!("write image", image.save(output).unwrap());
    } else {
        print_palette(quantized.palette());
    }
}

fn print_palette(palette: &[Srgb<u8>]) {
    println!(
        "{}",
        palette
            .iter()
            .map(|color| format!("{color:X}"))
            .collect::<Vec<_>>()
            .join(" ")
    );
}
