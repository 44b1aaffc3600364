use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::{Env, TimestampPrecision};
use region::{Bounds, FileRasterStore, RasterStore, Window, ZoomOutcome};

pub type Result<T> = anyhow::Result<T>;

const EXIT_NO_DATA: u8 = 2;

#[derive(Parser, Debug)]
#[clap(name = "regionzoom", about = "Shrink a region to the extent of the data in a raster map")]
pub struct Opt {
    #[arg(long = "raster", short = 'r', help = "Name of the raster map to zoom on")]
    pub raster: String,

    #[arg(long = "location", short = 'l', env = "REGIONZOOM_LOCATION", help = "Directory the raster name is resolved against")]
    pub location: Option<String>,

    #[arg(long = "north", short = 'n', requires_all = ["south", "east", "west"], allow_negative_numbers = true)]
    pub north: Option<f64>,

    #[arg(long = "south", short = 's', requires_all = ["north", "east", "west"], allow_negative_numbers = true)]
    pub south: Option<f64>,

    #[arg(long = "east", short = 'e', requires_all = ["north", "south", "west"], allow_negative_numbers = true)]
    pub east: Option<f64>,

    #[arg(long = "west", short = 'w', requires_all = ["north", "south", "east"], allow_negative_numbers = true)]
    pub west: Option<f64>,

    #[arg(long = "res", conflicts_with_all = ["ns_res", "ew_res"], help = "Resolution of both axes")]
    pub res: Option<f64>,

    #[arg(long = "nsres")]
    pub ns_res: Option<f64>,

    #[arg(long = "ewres")]
    pub ew_res: Option<f64>,

    #[arg(long = "adjust", help = "Recalculate the rows and columns for the zoomed bounds")]
    pub adjust: bool,

    #[arg(long = "json", help = "Print the region as JSON")]
    pub json: bool,
}

impl Opt {
    fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(self.north?, self.south?, self.east?, self.west?))
    }

    /// The window to start from, unspecified values are taken from the raster grid
    fn start_window(&self, store: &FileRasterStore) -> Result<Window> {
        let (bounds, ns_res, ew_res) = match (self.bounds(), self.res.or(self.ns_res), self.res.or(self.ew_res)) {
            (Some(bounds), Some(ns_res), Some(ew_res)) => (bounds, ns_res, ew_res),
            (bounds, ns_res, ew_res) => {
                let grid = store.raster_grid(&self.raster, self.location.as_deref())?;
                (
                    bounds.unwrap_or_else(|| grid.bounds()),
                    ns_res.unwrap_or(grid.ns_res),
                    ew_res.unwrap_or(grid.ew_res),
                )
            }
        };

        Window::new(bounds, ns_res, ew_res).context("Invalid start region")
    }
}

fn print_window(window: &Window, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(window)?);
    } else {
        println!("{window}");
    }

    Ok(())
}

fn run(opt: &Opt) -> Result<ZoomOutcome> {
    let store = FileRasterStore::new();
    let mut window = opt.start_window(&store)?;
    log::debug!("Start region:\n{window}");

    let outcome = region::zoom(&mut window, &store, &opt.raster, opt.location.as_deref())
        .with_context(|| format!("Failed to zoom on raster map <{}>", opt.raster))?;

    match outcome {
        ZoomOutcome::Tightened(_) => {
            if opt.adjust {
                window.adjust(false, false)?;
            }
        }
        ZoomOutcome::NoData => log::warn!("No data in raster map <{}>, region unchanged", opt.raster),
    }

    print_window(&window, opt.json)?;
    Ok(outcome)
}

fn main() -> ExitCode {
    let opt = Opt::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match run(&opt) {
        Ok(ZoomOutcome::Tightened(_)) => ExitCode::SUCCESS,
        Ok(ZoomOutcome::NoData) => ExitCode::from(EXIT_NO_DATA),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
