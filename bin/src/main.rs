#[macro_use]
extern crate log;

mod options;
mod params;

use clap::Parser;
use materials::create_material;
use options::Options;
use shading::geometry::*;
use shading::interaction::SurfaceInteraction;
use shading::material::*;
use shading::paramset::TextureParams;
use shading::pbrt::*;
use shading::reflection::BxDFType;
use shading::rng::RNG;
use shading::spectrum::Spectrum;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = run(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    let tp = TextureParams::from_material_params(params::param_set(options)?);
    let material = create_material(&options.material, &tp)?;

    println!("{}", material.name());
    walk(&material.children(), 1);

    let estimate = estimate_albedo(&material, options)?;
    let rgb = estimate.albedo.to_rgb();
    println!(
        "albedo at cos(theta) = {}: [{:.4}, {:.4}, {:.4}]",
        options.cos_theta, rgb[0], rgb[1], rgb[2]
    );
    if estimate.has_bssrdf {
        println!("subsurface scattering present; albedo covers the boundary only");
    }
    Ok(())
}

/// Prints the child graph depth first.
fn walk(children: &[Child], depth: usize) {
    for child in children {
        println!("{:indent$}{}", "", child.kind(), indent = 2 * depth);
        walk(&child.children(), depth + 1);
    }
}

struct AlbedoEstimate {
    albedo: Spectrum,
    has_bssrdf: bool,
}

/// Monte Carlo estimate of reflected plus transmitted energy for light
/// leaving along a fixed direction.
fn estimate_albedo(material: &dyn Material, options: &Options) -> Result<AlbedoEstimate, String> {
    if options.samples == 0 {
        return Err(String::from("Need at least one sample"));
    }
    if !(options.cos_theta > 0.0 && options.cos_theta <= 1.0) {
        return Err(format!("cos-theta must be in (0, 1], got {}", options.cos_theta));
    }

    let sin_theta = safe_sqrt(1.0 - options.cos_theta * options.cos_theta);
    let wo = Vector3f::new(sin_theta, 0.0, options.cos_theta);
    let surface = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), wo);

    let mut rng = RNG::new(options.seed);
    let mut sum = Spectrum::ZERO;
    let mut has_bssrdf = false;
    for _ in 0..options.samples {
        let mut si = surface.clone();
        let sf = material.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut rng);
        has_bssrdf |= sf.bssrdf.is_some();
        if let Some(bsdf) = sf.bsdf {
            let u = rng.uniform_point2f();
            let sample = bsdf.sample_f(&si.wo, &u, BxDFType::ALL);
            sum += bsdf.weight(&sample);
        }
    }
    debug!("Averaged {} samples on stream {}", options.samples, options.seed);

    Ok(AlbedoEstimate {
        albedo: sum / options.samples as Float,
        has_bssrdf,
    })
}
