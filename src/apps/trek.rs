//! Trek: a tiny real-time space game.
//!
//! The galaxy is 8×8 quadrants, each 8×8 sectors, so a ship's real
//! coordinates live in `[0, 64)` on both axes with `(0, 0)` the top-left
//! corner. One game tick per elapsed second moves the ship along its
//! course.
//!
//! The game clock is advanced lazily: every trek action first applies the
//! whole seconds elapsed since the previous action, so nothing mutates the
//! session between actions.

use std::f64::consts::PI;
use std::time::Instant;

use rand::Rng;
use sdui_types::{Command, Course};
use tracing::{debug, info};

use crate::dispatch::{ActionContext, ActionHandler, ActionKind, App, HandlerTable};
use crate::error::ActionError;

pub const APP_NAME: &str = "trek";

pub const WELCOME_MESSAGE: &str = "Welcome to Trek! Use trek-start to begin your journey.";

/// Quadrants (and sectors per quadrant) along each axis.
pub const GRID: u32 = 8;

/// Upper bound (exclusive) of real coordinates.
pub const EXTENT: f64 = (GRID * GRID) as f64;

const EDGE: f64 = 63.9999;

/// Distance covered per tick at warp 1, in sectors.
const SPEED: f64 = 0.1;

pub const MIN_DIR: f64 = 1.0;
pub const MAX_DIR: f64 = 9.0;
pub const MAX_WARP: f64 = 8.0;

pub struct TrekApp;

impl App for TrekApp {
    fn name(&self) -> &'static str {
        APP_NAME
    }

    fn handlers(&self) -> HandlerTable {
        HandlerTable::from_kinds::<TrekAction>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrekAction {
    /// Overrides the default `show-app`; stops a running clock.
    ShowApp,
    Start,
    Status,
    /// `set-course {dir, warp}`
    SetCourse,
}

impl ActionKind for TrekAction {
    const ALL: &'static [Self] = &[
        TrekAction::ShowApp,
        TrekAction::Start,
        TrekAction::Status,
        TrekAction::SetCourse,
    ];

    fn name(self) -> &'static str {
        match self {
            TrekAction::ShowApp => "show-app",
            TrekAction::Start => "trek-start",
            TrekAction::Status => "trek-status",
            TrekAction::SetCourse => "set-course",
        }
    }
}

impl ActionHandler for TrekAction {
    fn handle(&self, ctx: &mut ActionContext<'_>) -> Result<Vec<Command>, ActionError> {
        let now = Instant::now();
        if let Some(game) = ctx.app_state().extension_mut::<TrekGame>() {
            game.catch_up(now);
        }

        match self {
            TrekAction::ShowApp => {
                if let Some(game) = ctx.app_state().extension_mut::<TrekGame>() {
                    game.stop();
                }
                Ok(vec![Command::ShowTrekWelcome {
                    message: WELCOME_MESSAGE.to_string(),
                }])
            }
            TrekAction::Start => {
                let game = TrekGame::start(now, &mut rand::thread_rng());
                info!(
                    "Trek started for {}: {}",
                    ctx.instance(),
                    game.ship.status()
                );
                ctx.app_state().insert_extension(game);
                Ok(vec![Command::log(format!(
                    "Trek app: trek-start with data: {}",
                    ctx.input.to_value()
                ))])
            }
            TrekAction::Status => Ok(vec![match ctx.app_state().extension::<TrekGame>() {
                Some(game) => game.info(),
                None => TrekGame::idle_info(),
            }]),
            TrekAction::SetCourse => {
                let dir = ctx.input.get_f64("dir")?;
                let warp = ctx.input.get_f64("warp")?;
                let game = ctx
                    .app_state()
                    .extension_mut::<TrekGame>()
                    .ok_or_else(|| ActionError::invalid_input("game", "use trek-start first"))?;
                let course = game.ship.set_course(dir, warp)?;
                debug!("Course set: dir {}, warp {}", course.dir, course.warp);
                Ok(vec![Command::log(format!(
                    "Course set: dir {}, warp {}.",
                    course.dir, course.warp
                ))])
            }
        }
    }
}

/// Elapsed game time in whole seconds.
#[derive(Debug, Clone, Copy)]
pub struct Stardate {
    last_update: Option<Instant>,
    elapsed: u64,
}

impl Stardate {
    fn started(now: Instant) -> Self {
        Self {
            last_update: Some(now),
            elapsed: 0,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.last_update.is_some()
    }

    /// Whole seconds that became due since the last update.
    fn due(&mut self, now: Instant) -> u64 {
        let Some(last) = self.last_update else {
            return 0;
        };
        let seconds = now.saturating_duration_since(last).as_secs();
        // Keep the fractional remainder for the next update.
        self.last_update = Some(last + std::time::Duration::from_secs(seconds));
        seconds
    }

    /// `HH:MM:SS`
    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

pub fn format_elapsed(seconds: u64) -> String {
    let hr = seconds / 3600;
    let min = (seconds % 3600) / 60;
    let sec = seconds % 60;
    format!("{:02}:{:02}:{:02}", hr, min, sec)
}

/// Quadrant or sector coordinate, both axes in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub lat: u32,
    pub lon: u32,
}

impl Coord {
    pub fn name(&self) -> String {
        format!("[{},{}]", self.lat, self.lon)
    }
}

/// A point in the galaxy given by its real coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub rlat: f64,
    pub rlon: f64,
}

impl Location {
    pub fn new(rlat: f64, rlon: f64) -> Self {
        Self {
            rlat: rlat.clamp(0.0, EDGE),
            rlon: rlon.clamp(0.0, EDGE),
        }
    }

    fn whole(&self) -> (u32, u32) {
        let max = GRID * GRID - 1;
        (
            (self.rlat.floor() as u32).min(max),
            (self.rlon.floor() as u32).min(max),
        )
    }

    pub fn quadrant(&self) -> Coord {
        let (wlat, wlon) = self.whole();
        Coord {
            lat: 1 + wlat / GRID,
            lon: 1 + wlon / GRID,
        }
    }

    pub fn sector(&self) -> Coord {
        let (wlat, wlon) = self.whole();
        Coord {
            lat: 1 + wlat % GRID,
            lon: 1 + wlon % GRID,
        }
    }

    /// Offset within the sector, each axis in `[0, 1)`.
    pub fn position(&self) -> (f64, f64) {
        let (wlat, wlon) = self.whole();
        (self.rlat - wlat as f64, self.rlon - wlon as f64)
    }
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub location: Location,
    pub course: Course,
}

impl Ship {
    pub fn at(location: Location) -> Self {
        Self {
            location,
            course: Course::default(),
        }
    }

    /// One tick of movement along the current course, stopping at the edge.
    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// `ticks` ticks at once. The velocity is constant, so clamping the
    /// end point gives the same result as clamping after every tick.
    pub fn advance_by(&mut self, ticks: u64) {
        let Course { dir, warp } = self.course;
        if warp <= 0.0 || ticks == 0 {
            return;
        }
        // dir 1 is east, 3 north, 5 west, 7 south
        let a = 2.0 * PI * (dir - 1.0) / 8.0;
        let ulat = -SPEED * a.sin();
        let ulon = SPEED * a.cos();
        let distance = warp * ticks as f64;
        self.location = Location::new(
            self.location.rlat + ulat * distance,
            self.location.rlon + ulon * distance,
        );
    }

    /// Update the course; a missing part keeps its current value.
    pub fn set_course(&mut self, dir: Option<f64>, warp: Option<f64>) -> Result<Course, ActionError> {
        let dir = dir.unwrap_or(self.course.dir);
        let warp = warp.unwrap_or(self.course.warp);
        if !(MIN_DIR..MAX_DIR).contains(&dir) {
            return Err(ActionError::invalid_input(
                "dir",
                format!("{} is outside [{}, {})", dir, MIN_DIR, MAX_DIR),
            ));
        }
        if !(0.0..=MAX_WARP).contains(&warp) {
            return Err(ActionError::invalid_input(
                "warp",
                format!("{} is outside [0, {}]", warp, MAX_WARP),
            ));
        }
        self.course = Course { dir, warp };
        Ok(self.course)
    }

    pub fn status(&self) -> String {
        let (plat, plon) = self.location.position();
        format!(
            "Quadrant: {}; Sector: {}; Position: [{},{}]",
            self.location.quadrant().name(),
            self.location.sector().name(),
            (1000.0 * plat).floor(),
            (1000.0 * plon).floor()
        )
    }
}

/// Per-session game state, kept as an app-state extension.
#[derive(Debug, Clone)]
pub struct TrekGame {
    pub stardate: Stardate,
    pub ship: Ship,
}

impl TrekGame {
    /// New game with the ship at a random location.
    pub fn start<R: Rng + ?Sized>(now: Instant, rng: &mut R) -> Self {
        let location = Location::new(rng.gen_range(0.0..EXTENT), rng.gen_range(0.0..EXTENT));
        Self {
            stardate: Stardate::started(now),
            ship: Ship::at(location),
        }
    }

    pub fn catch_up(&mut self, now: Instant) {
        let due = self.stardate.due(now);
        self.advance(due);
    }

    /// Apply `ticks` seconds of game time.
    pub fn advance(&mut self, ticks: u64) {
        self.stardate.elapsed = self.stardate.elapsed.saturating_add(ticks);
        self.ship.advance_by(ticks);
    }

    pub fn stop(&mut self) {
        self.stardate.last_update = None;
    }

    pub fn info(&self) -> Command {
        Command::ShowTrekInfo {
            is_active: self.stardate.is_running(),
            stardate: self.stardate.formatted(),
            status: self.ship.status(),
            course: self.ship.course,
        }
    }

    pub fn idle_info() -> Command {
        Command::ShowTrekInfo {
            is_active: false,
            stardate: format_elapsed(0),
            status: "No game in progress.".to_string(),
            course: Course::default(),
        }
    }
}
