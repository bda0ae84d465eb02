// Fluid Pressure & Flow Constants - SINGLE SOURCE OF TRUTH
//
// This file contains ALL default physical and tuning constants.
// Config defaults, scenes and tests read from here so everything agrees.
//
// Units are SI (metres, seconds, kilograms, pascals) unless stated otherwise.
// Coordinate frame: y grows upward and the ground surface sits at y = 0.

/// Fluid and atmosphere constants
pub mod fluid {
    /// Earth surface gravity (m/s²)
    pub const EARTH_GRAVITY: f64 = 9.8;

    /// Gravity slider limits for pool screens (m/s²)
    pub const MIN_GRAVITY: f64 = 1.0;
    pub const MAX_GRAVITY: f64 = 25.0;

    /// Density of the supported fluids (kg/m³)
    pub const GASOLINE_DENSITY: f64 = 700.0;
    pub const WATER_DENSITY: f64 = 1000.0;
    pub const HONEY_DENSITY: f64 = 1420.0;

    /// Standard air pressure at sea level (Pa)
    pub const EARTH_AIR_PRESSURE: f64 = 101_325.0;

    /// Standard air pressure at 500 ft (Pa)
    pub const EARTH_AIR_PRESSURE_AT_500_FT: f64 = 99_490.0;

    /// 500 ft expressed in metres, the second calibration altitude
    pub const REFERENCE_ALTITUDE: f64 = 150.0;
}

/// Pipe flow screen constants
pub mod flow {
    /// Volumetric flow rate limits (L/s)
    pub const MIN_FLOW_RATE: f64 = 1000.0;
    pub const MAX_FLOW_RATE: f64 = 10_000.0;
    pub const DEFAULT_FLOW_RATE: f64 = 5000.0;

    /// Litres per cubic metre
    pub const LITERS_PER_CUBIC_METER: f64 = 1000.0;

    /// Default pipe: control-point x positions and rail heights (m)
    pub const DEFAULT_CONTROL_XS: [f64; 7] = [-6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0];
    pub const DEFAULT_TOP_Y: f64 = -1.0;
    pub const DEFAULT_BOTTOM_Y: f64 = -3.0;

    /// Narrowest cross-section the geometry will report (m)
    pub const MIN_CROSS_SECTION: f64 = 0.1;

    /// Minimum x gap kept between an endpoint pair and its neighbour (m)
    pub const MIN_CONTROL_GAP: f64 = 0.2;

    /// Half-width of the 1-2-1 smoothing window used for tweaked velocity (m)
    pub const VELOCITY_SMOOTHING_HALF_WIDTH: f64 = 0.1;

    /// Flow particle injection rate (particles/s)
    pub const PARTICLE_INJECTION_RATE: f64 = 10.0;

    /// Flow particles spawn with a fraction in [MIN, MIN + SPAN)
    pub const PARTICLE_FRACTION_MIN: f64 = 0.15;
    pub const PARTICLE_FRACTION_SPAN: f64 = 0.7;
    pub const FLOW_PARTICLE_RADIUS: f64 = 0.1;

    /// Grid injector layout
    pub const GRID_COLUMNS: usize = 4;
    pub const GRID_ROWS: usize = 9;
    pub const GRID_COLUMN_SPACING: f64 = 0.3;
    pub const GRID_PARTICLE_RADIUS: f64 = 0.06;

    /// Simulated seconds before the grid injector can fire again
    pub const GRID_INJECTOR_COOLDOWN: f64 = 5.0;

    /// Largest frame delta the flow screen accepts (s)
    pub const MAX_FRAME_DT: f64 = 0.04;

    /// Time scale applied in slow motion
    pub const SLOW_MOTION_FACTOR: f64 = 0.33;
}

/// Water tower screen constants
pub mod tower {
    /// Tank geometry (m)
    pub const TANK_RADIUS: f64 = 0.85;
    pub const TANK_HEIGHT: f64 = 1.8;
    pub const HOLE_SIZE: f64 = 0.18;

    /// Default lower-left corner of the tank (m)
    pub const TANK_POSITION: [f64; 2] = [-0.6, 1.5];

    /// Allowed tank elevation range, i.e. leg height (m)
    pub const MIN_TANK_ELEVATION: f64 = 0.3;
    pub const MAX_TANK_ELEVATION: f64 = 1.9;

    /// Faucet outlet (m)
    pub const FAUCET_POSITION: [f64; 2] = [0.25, 3.8];

    /// Faucet flow limit (m³/s)
    pub const MAX_FAUCET_FLOW_RATE: f64 = 0.5;

    /// Hose nozzle (m) and default angle (degrees)
    pub const HOSE_POSITION: [f64; 2] = [4.5, 1.8];
    pub const HOSE_ANGLE_DEGREES: f64 = 0.0;

    /// Volume of each drop leaving the sluice or hose (m³)
    pub const DROP_VOLUME: f64 = 0.004;

    /// Random spread applied to spawn positions (m)
    pub const FAUCET_JITTER: f64 = 0.01;
    pub const SLUICE_JITTER: f64 = 0.04;

    /// Fixed physics quantum (s)
    pub const QUANTUM: f64 = 0.016;

    /// Largest frame delta accepted before clamping (s)
    pub const MAX_FRAME_DT: f64 = 1.0;
}

/// Chamber pool screen constants
pub mod chamber {
    /// Size of the passage between the chambers (m)
    pub const PASSAGE_SIZE: f64 = 0.5;

    /// Openings to the air (m)
    pub const LEFT_OPENING_WIDTH: f64 = 0.5;
    pub const RIGHT_OPENING_WIDTH: f64 = 2.3;

    /// Height of each chamber (m)
    pub const CHAMBER_HEIGHT: f64 = 1.3;

    /// Full apparatus depth below ground (m)
    pub const MAX_HEIGHT: f64 = 3.0;

    /// Water height above the pool floor without load (m)
    pub const DEFAULT_HEIGHT: f64 = 2.3;

    pub const LEFT_CHAMBER_X: f64 = 1.55;
    pub const LEFT_CHAMBER_WIDTH: f64 = 2.8;
    pub const RIGHT_CHAMBER_X: f64 = 6.27;
    pub const RIGHT_CHAMBER_WIDTH: f64 = 1.1;

    /// Default masses (kg) and the layout they rest in on the ground
    pub const MASSES: [f64; 3] = [500.0, 250.0, 250.0];
    pub const MASS_OFFSET: f64 = 1.35;
    pub const MASS_SEPARATION: f64 = 0.03;

    /// Mass whose block is a full passage-size cube (kg); lighter blocks are shorter
    pub const FULL_BLOCK_MASS: f64 = 500.0;

    /// How far a block may be off the left opening's centre and still drop in (m)
    pub const OPENING_CAPTURE_TOLERANCE: f64 = 0.1;

    /// Sub-steps per frame for mass integration
    pub const MASS_SUBSTEPS: u32 = 10;

    /// Velocity damping of the stacked load (1/s)
    pub const STACK_DAMPING: f64 = 4.0;

    /// Rate at which unloaded displacement decays to zero (1/s)
    pub const RELAXATION_RATE: f64 = 6.32;

    /// Jitter filter tolerance (fraction of the previous dt)
    pub const JITTER_TOLERANCE: f64 = 0.3;
}

/// Square and mystery pool constants
pub mod pool {
    /// Pool extent (m)
    pub const POOL_LEFT_X: f64 = 2.5;
    pub const POOL_WIDTH: f64 = 4.0;
    pub const POOL_DEPTH: f64 = 3.0;

    /// Initial water height (m)
    pub const DEFAULT_FLUID_LEVEL: f64 = 2.0;

    /// Faucet flow limits (m³/s per metre of pool depth)
    pub const FILL_FAUCET_MAX_FLOW: f64 = 0.25;
    pub const DRAIN_FAUCET_MAX_FLOW: f64 = 0.25;

    /// Mystery scene choices
    pub const MYSTERY_DENSITIES: [f64; 3] = [1700.0, 840.0, 1100.0];
    pub const MYSTERY_GRAVITIES: [f64; 3] = [20.0, 14.0, 6.5];
    pub const MYSTERY_COLORS: [[u8; 3]; 3] = [[113, 35, 136], [179, 115, 176], [60, 29, 71]];
}

/// Clock constants
pub mod time {
    /// Ticks whose accumulated time falls short of a quantum by less than this still fire (s)
    pub const QUANTUM_EPSILON: f64 = 1e-9;

    /// Default frame delta used by the headless runner (s)
    pub const DEFAULT_FRAME_DT: f64 = 1.0 / 60.0;
}
