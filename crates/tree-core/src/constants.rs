use glam::Vec3;

// Shared layout and animation tuning constants for the tree scene.

// Tree shape
pub const TREE_HEIGHT: f32 = 22.0; // cone spans -11..+11 on Y
pub const TREE_BASE_RADIUS: f32 = 7.5; // radius at the bottom of the cone
pub const SURFACE_JITTER: f32 = 0.5; // max inward offset for surface elements
pub const MIN_SURFACE_RADIUS: f32 = 0.1; // keeps the apex from collapsing to a line
pub const OUTER_BAND: f32 = 0.8; // elements this close to the surface count as "outer"

// Dataset sizes
pub const STRUCTURAL_COUNT: usize = 1000; // spiral-placed foliage and ornaments
pub const DUST_COUNT: usize = 1500; // volume filler
pub const PARTICLE_COUNT: usize = STRUCTURAL_COUNT + DUST_COUNT;

// Category cut points on a single uniform draw (checked top-down)
pub const CANE_THRESHOLD: f32 = 0.94;
pub const GINGERBREAD_THRESHOLD: f32 = 0.88;
pub const CUBE_THRESHOLD: f32 = 0.82;
pub const OUTER_ORNAMENT_THRESHOLD: f32 = 0.6; // outer spheres above this become ornaments

// Scatter cloud extents (full width per axis)
pub const STRUCTURAL_SCATTER_EXTENT: Vec3 = Vec3::new(50.0, 50.0, 30.0);
pub const DUST_SCATTER_EXTENT: Vec3 = Vec3::new(60.0, 60.0, 40.0);
pub const PHOTO_SCATTER_EXTENT: Vec3 = Vec3::new(20.0, 20.0, 10.0);
pub const PHOTO_SCATTER_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 5.0); // pull photos toward the camera

// Per-element speed ranges
pub const STRUCTURAL_SPEED_MIN: f32 = 0.01;
pub const STRUCTURAL_SPEED_MAX: f32 = 0.03;
pub const DUST_SPEED_MIN: f32 = 0.005;
pub const DUST_SPEED_MAX: f32 = 0.015;

// Base scales
pub const BASE_SCALE_MIN: f32 = 0.2;
pub const BASE_SCALE_MAX: f32 = 0.5;
pub const CANE_SCALE: Vec3 = Vec3::new(0.06, 0.6, 0.06);
pub const GINGERBREAD_SCALE: Vec3 = Vec3::new(0.5, 0.6, 0.1);
pub const DUST_SCALE: f32 = 0.1;

// Particle motion
pub const PARTICLE_LERP: f32 = 0.04; // exponential smoothing per frame
pub const DRIFT_AMPLITUDE: f32 = 0.1; // scattered ambient drift
pub const FOCUS_CLEAR_RADIUS: f32 = 8.0; // elements closer than this move away from a focused photo
pub const FOCUS_PUSH: f32 = 1.5;
pub const SCATTER_SPIN: f32 = 0.01; // radians per frame on X and Y
pub const DUST_TWINKLE_SPIN: f32 = 0.02;
pub const IDLE_SPIN: f32 = 0.005; // assembled spheres and cubes, Y only
pub const TILT_LERP: f32 = 0.05; // canes and gingerbread ease toward their tilt
pub const TILT_AMPLITUDE: f32 = 0.2;
pub const BREATH_RATE: f32 = 3.0;
pub const BREATH_AMPLITUDE: f32 = 0.05;

// Photo panels
pub const PHOTO_COUNT: usize = 3;
pub const PHOTO_LERP: f32 = 0.06;
pub const PHOTO_BAND_HEIGHT: f32 = 12.0; // vertical spread of the panels on the tree
pub const PHOTO_BAND_CENTER: f32 = 2.0;
pub const PHOTO_INSET: f32 = 0.2; // nestle panels slightly inside the surface
pub const PHOTO_ANGLE_OFFSET: f32 = 1.0; // radians
pub const PHOTO_FOCUS_POSITION: Vec3 = Vec3::new(0.0, 0.0, 15.0);
pub const PHOTO_FOCUS_SCALE: f32 = 3.5;
pub const PHOTO_TREE_SCALE: f32 = 0.5;
pub const PHOTO_SCATTER_SCALE: f32 = 1.5;
pub const PHOTO_BOB_AMPLITUDE: f32 = 0.05;
pub const PHOTO_SIZE: f32 = 3.0; // square photo quad edge at scale 1
pub const PHOTO_FRAME_SIZE: Vec3 = Vec3::new(3.2, 3.2, 0.1);
pub const PHOTO_FRAME_DEPTH: f32 = -0.05; // frame sits just behind the photo
pub const PHOTO_FACE_DEPTH: f32 = 0.06;
pub const PHOTO_FRAME_GLOW: f32 = 0.2;
pub const PHOTO_FRAME_FOCUS_GLOW: f32 = 0.9; // focused frame lights up
pub const PANEL_HITBOX: Vec3 = Vec3::new(4.0, 4.0, 1.0); // click target, larger than the frame

// Camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 200.0;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 25.0);
pub const CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const CAMERA_LERP: f32 = 0.02;
pub const CAMERA_ORBIT_RADIUS: f32 = 28.0; // assembled drift
pub const CAMERA_FOCUS_EYE: Vec3 = Vec3::new(0.0, 0.0, 22.0);
pub const ORBIT_DAMPING: f32 = 0.05; // user orbit while scattered
pub const ORBIT_PITCH_LIMIT: f32 = 1.4;

// Zoom
pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;

// Ambient effects
pub const METEOR_COUNT: usize = 20;
pub const METEOR_FLOOR: f32 = -50.0; // reset below this height
pub const SNOW_COUNT: usize = 1500;
pub const SNOW_INNER_RADIUS: f32 = 8.0;
pub const SNOW_OUTER_RADIUS: f32 = 20.0;
pub const SNOW_HEIGHT: f32 = 40.0;
pub const SNOW_SPIN: f32 = 0.05; // radians per second
pub const SNOW_SCALE: f32 = 0.2;
pub const STAR_HEIGHT: f32 = 11.2;
pub const STAR_POINTS: usize = 5;
pub const STAR_OUTER_RADIUS: f32 = 1.5;
pub const STAR_INNER_RADIUS: f32 = 0.6;
pub const STAR_SPIN: f32 = 0.5;
pub const STAR_BOB_AMPLITUDE: f32 = 0.1;

// Star field backdrop
pub const STARFIELD_COUNT: usize = 5000;
pub const STARFIELD_RADIUS: f32 = 100.0; // inner edge of the shell
pub const STARFIELD_DEPTH: f32 = 50.0; // shell thickness
pub const STARFIELD_SCALE: f32 = 0.4; // largest star
pub const STARFIELD_TWINKLE: f32 = 1.0; // radians per second

// Lights (range 0 means no falloff)
pub const LIGHT_COUNT: usize = 5;
pub const LIGHT_AMBIENT: f32 = 0.2;
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 20.0, 10.0);
pub const KEY_LIGHT_INTENSITY: f32 = 0.9;
pub const FILL_LIGHT_POSITION: Vec3 = Vec3::new(-10.0, 10.0, -10.0);
pub const FILL_LIGHT_INTENSITY: f32 = 0.6;
pub const UNDER_LIGHT_POSITION: Vec3 = Vec3::new(0.0, -10.0, 5.0);
pub const UNDER_LIGHT_INTENSITY: f32 = 0.6;
pub const STAR_LIGHT_INTENSITY: f32 = 2.4;
pub const STAR_LIGHT_RANGE: f32 = 15.0;
pub const FOCUS_LIGHT_INTENSITY: f32 = 0.6;
pub const FOCUS_LIGHT_RANGE: f32 = 10.0;
pub const FOCUS_LIGHT_OFFSET: f32 = 1.0; // in front of the focused photo
