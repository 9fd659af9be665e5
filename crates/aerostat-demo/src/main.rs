//! Headless demo binary wiring the balloon scene crates together.
//!
//! Configuration is loaded from `aerostat.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p aerostat-demo` to walk through the terrain,
//! fog, scene, and sky subsystems; run with
//! `cargo run -p aerostat-demo -- --seed 7 --fog-height 80` to override
//! settings.

use clap::Parser;
use glam::{Quat, Vec3};
use tracing::{info, warn};

use aerostat_atmosphere::{
    FaceSide, FogModel, FogParams, FogParamsPatch, FoggedPipeline, MaterialFlags, combined_fog,
    distance_fog_factor,
};
use aerostat_config::{CliArgs, Config};
use aerostat_mesh::TerrainMesh;
use aerostat_render::{Camera, MeshBuffer};
use aerostat_scene::{NodeTransform, RingSet, SceneGraph};
use aerostat_sky::{SkyDome, SkyDomeRenderer, SkyRingConfig, StarConfig, ring_blend, star_opacity};
use aerostat_terrain::{
    MountainRingParams, PatchParams, generate_mountain_ring, generate_patch,
};

/// Map the terrain section of the config onto patch generation parameters.
fn patch_params(config: &Config) -> PatchParams {
    let t = &config.terrain;
    PatchParams {
        width: t.width,
        depth: t.depth,
        spacing_x: t.spacing_x,
        spacing_z: t.spacing_z,
        max_height: t.max_height,
        noise_scale: t.noise_scale,
        base_color: t.base_color,
    }
}

/// Map the mountain section of the config onto ring generation parameters.
fn ring_params(config: &Config) -> MountainRingParams {
    let m = &config.mountains;
    MountainRingParams {
        count: m.count,
        ring_distance: m.ring_distance,
        min_height: m.min_height,
        max_height: m.max_height,
        segment_width: m.segment_width,
        segment_depth: m.segment_depth,
        segment_spacing: m.segment_spacing,
        noise_scale: m.noise_scale,
        mountain_color: m.mountain_color,
        ground_color: m.ground_color,
        mountain_y: m.mountain_y,
        ground_y: m.ground_y,
    }
}

/// Map the fog section of the config onto the live fog parameters.
fn fog_params(config: &Config) -> FogParams {
    let f = &config.fog;
    FogParams {
        depth: f.depth,
        start_distance: f.start_distance,
        end_distance: f.end_distance,
        close_hue: f.close_hue,
        distant_hue: f.distant_hue,
        close_brightness: f.close_brightness,
        distant_brightness: f.distant_brightness,
        color_start_distance: f.color_start_distance,
        color_end_distance: f.color_end_distance,
        height: f.height,
    }
}

/// Build the sky state from the sky and star sections of the config.
fn sky_dome(config: &Config) -> SkyDome {
    let s = &config.sky;
    let mut sky = SkyDome::new(
        s.base_color,
        SkyRingConfig {
            height: s.ring_height,
            falloff: s.ring_falloff,
            hue: s.ring_hue,
            brightness: s.ring_brightness,
        },
        StarConfig {
            size_min: config.stars.size_min,
            size_max: config.stars.size_max,
            density: config.stars.density,
            fade_offset: config.stars.fade_offset,
        },
    );
    sky.horizon_band = s.horizon_band;
    sky
}

/// Demonstrates procedural terrain patch generation.
fn demonstrate_terrain_patch(config: &Config) -> TerrainMesh {
    info!("Starting terrain patch demonstration");

    let params = patch_params(config);
    let mesh = generate_patch(&params);
    let (min_h, max_h) = mesh.height_bounds().unwrap_or((0.0, 0.0));

    info!(
        "Terrain patch: {}x{} grid, {} vertices, {} triangles, heights [{:.2}, {:.2}]",
        params.width,
        params.depth,
        mesh.vertex_count(),
        mesh.triangle_count(),
        min_h,
        max_h,
    );

    // Regeneration is deterministic: the same parameters rebuild the same surface.
    let again = generate_patch(&params);
    assert_eq!(mesh.vertices(), again.vertices());
    info!("Regeneration reproduced the identical patch");

    info!("Terrain patch demonstration completed successfully");
    mesh
}

/// Demonstrates mountain ring generation and seed reproducibility.
fn demonstrate_mountain_ring(config: &Config) -> usize {
    info!("Starting mountain ring demonstration");

    let params = ring_params(config);
    let seed = config.mountains.seed;
    let ring = generate_mountain_ring(&params, seed);

    let total_triangles: usize = ring
        .segments
        .iter()
        .map(|s| s.mesh.triangle_count())
        .sum::<usize>()
        + ring.ground.mesh.triangle_count();
    info!(
        "Mountain ring: {} segments (requested {}) + ground plane, {} triangles total",
        ring.segment_count(),
        params.count,
        total_triangles,
    );

    // Same seed, same ring; a different seed moves the segments around.
    let replay = generate_mountain_ring(&params, seed);
    let identical = ring
        .segments
        .iter()
        .zip(&replay.segments)
        .all(|(a, b)| a.position == b.position && a.yaw == b.yaw);
    let other = generate_mountain_ring(&params, seed.wrapping_add(1));
    let moved = ring
        .segments
        .iter()
        .zip(&other.segments)
        .filter(|(a, b)| (a.position - b.position).length() > 1e-3)
        .count();
    info!(
        "Seed {}: replay identical = {}, {} of {} segments moved under seed {}",
        seed,
        identical,
        moved,
        ring.segment_count(),
        seed.wrapping_add(1),
    );

    info!("Mountain ring demonstration completed successfully");
    ring.segment_count()
}

/// Demonstrates the fog model: materials, parameter propagation, and the
/// per-frame fog plane transform.
fn demonstrate_fog_model(config: &Config) {
    info!("Starting fog model demonstration");

    let mut fog = FogModel::new(fog_params(config));
    let terrain_material = fog.create_material(config.terrain.base_color, FaceSide::Front);
    let _mountain_material = fog.create_material(config.mountains.mountain_color, FaceSide::Front);
    info!("Registered {} fogged materials", fog.material_count());

    // Sample the CPU fog curve the fragment shader mirrors.
    let params = *fog.params();
    let mid = (params.start_distance + params.end_distance) * 0.5;
    for distance in [
        params.start_distance * 0.5,
        params.start_distance,
        mid,
        params.end_distance,
        params.end_distance * 2.0,
    ] {
        info!(
            "  distance {:>7.1}: distance_fog={:.3}, combined(above plane)={:.3}",
            distance,
            distance_fog_factor(distance, params.start_distance, params.end_distance),
            combined_fog(&params, distance, -10.0),
        );
    }

    // A parameter update reaches every registered material in one call.
    fog.update_params(&FogParamsPatch {
        height: Some(params.height + 25.0),
        distant_hue: Some(250.0),
        ..FogParamsPatch::default()
    });
    info!(
        "After update: plane constant = {}, material depth uniform = {}",
        fog.world_plane().w,
        fog.uniforms(terrain_material).map(|u| u.depth()).unwrap_or(0.0),
    );

    // The per-frame hook re-expresses the plane in view space.
    let camera = Camera {
        position: Vec3::new(0.0, 60.0, 0.0),
        rotation: Quat::from_rotation_y(0.6),
        ..Camera::default()
    };
    fog.update_plane(&camera);
    info!("View-space fog plane: {:?}", fog.view_plane());

    info!("Fog model demonstration completed successfully");
}

/// Demonstrates the scene graph's disposal discipline across a ring rebuild.
fn demonstrate_ring_regeneration(config: &Config) -> usize {
    info!("Starting ring regeneration demonstration");

    let mut scene = SceneGraph::new();
    let mut fog = FogModel::new(fog_params(config));

    // The terrain patch stays put while the ring is rebuilt around it.
    let patch = generate_patch(&patch_params(config));
    let patch_material = fog.create_material(config.terrain.base_color, FaceSide::Front);
    scene.insert(patch, Some(patch_material), NodeTransform::default());
    let baseline_nodes = scene.child_count();
    let baseline_materials = fog.material_count();

    let params = ring_params(config);
    let ring = generate_mountain_ring(&params, config.mountains.seed);
    let mut set = RingSet::spawn(&mut scene, &mut fog, ring, &params);
    info!(
        "Spawned ring: {} scene nodes, {} fog materials",
        scene.child_count(),
        fog.material_count(),
    );

    // Rebuild with a different segment count; the old set must be fully released.
    let bigger = MountainRingParams {
        count: params.count + 8,
        ..params
    };
    let new_count = set.regenerate(&mut scene, &mut fog, &bigger, config.mountains.seed + 1);
    assert_eq!(scene.child_count(), baseline_nodes + new_count + 1);
    assert_eq!(fog.material_count(), baseline_materials + new_count + 1);
    info!(
        "Regenerated ring: {} segments, counts returned to baseline + new set",
        new_count,
    );

    set.despawn(&mut scene, &mut fog);
    info!(
        "After despawn: {} scene nodes, {} fog materials (baseline {}, {})",
        scene.child_count(),
        fog.material_count(),
        baseline_nodes,
        baseline_materials,
    );

    info!("Ring regeneration demonstration completed successfully");
    new_count
}

/// Demonstrates the sky dome: fog-consistent horizon, ring band, star fade.
fn demonstrate_sky(config: &Config) {
    info!("Starting sky dome demonstration");

    let fog = FogModel::new(fog_params(config));
    let mut sky = sky_dome(config);
    sky.update_fog_blend(&fog);
    info!(
        "Horizon color tracks distant fog: {:?}",
        sky.horizon_color(),
    );

    for normal_y in [0.0, 0.1, 0.25, 0.5, 1.0] {
        info!(
            "  normal.y {:.2}: ring_blend={:.3}, star_opacity={:.3}",
            normal_y,
            ring_blend(normal_y, &sky.ring),
            star_opacity(normal_y, sky.stars.fade_offset),
        );
    }

    info!("Sky dome demonstration completed successfully");
}

/// Demonstrates GPU upload of the generated scene: terrain buffers, the fogged
/// pipeline, and the sky dome renderer. Skipped when no adapter is available.
fn demonstrate_gpu_upload(config: &Config) {
    info!("Starting GPU upload demonstration");

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = match pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    })) {
        Ok(adapter) => adapter,
        Err(e) => {
            warn!("No GPU adapter available, skipping GPU demonstration: {e}");
            return;
        }
    };

    let (device, _queue) = match pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: None,
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::default(),
        ..Default::default()
    })) {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Failed to create GPU device, skipping GPU demonstration: {e}");
            return;
        }
    };

    let surface_format = wgpu::TextureFormat::Bgra8UnormSrgb;
    let depth_format = wgpu::TextureFormat::Depth32Float;

    let patch = generate_patch(&patch_params(config));
    let buffer = MeshBuffer::upload(&device, "terrain-patch", &patch);
    info!(
        "Uploaded terrain patch: {} indices on the GPU",
        buffer.index_count,
    );

    let _pipeline = FoggedPipeline::new(
        &device,
        surface_format,
        Some(depth_format),
        FaceSide::Front,
        &MaterialFlags::default(),
    );
    info!("Compiled the fogged terrain pipeline");

    let _sky_renderer = SkyDomeRenderer::new(&device, surface_format, 5000.0);
    info!("Compiled the sky dome pipeline");

    info!("GPU upload demonstration completed successfully");
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .expect("Failed to resolve config directory")
            .join("aerostat")
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    // Initialize logging with config and debug settings
    let log_dir = config_dir.join("logs");
    aerostat_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    // Demonstrate terrain patch generation
    demonstrate_terrain_patch(&config);

    // Demonstrate mountain ring generation
    demonstrate_mountain_ring(&config);

    // Demonstrate the fog model
    demonstrate_fog_model(&config);

    // Demonstrate ring regeneration and disposal
    demonstrate_ring_regeneration(&config);

    // Demonstrate the sky dome
    demonstrate_sky(&config);

    // Demonstrate GPU upload
    demonstrate_gpu_upload(&config);

    info!("All demonstrations completed");
}
