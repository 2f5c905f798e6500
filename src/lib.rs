use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod utils;

use config::*;
use utils::tick_interval_ms;

pub type MarkerId = u64;
pub type RegionIndex = usize;

/// A single box, circle or triangle.
///
/// Boxes are positioned in pixels from the region's top-left corner; circles
/// and triangles in percent of the region's size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub x: f64,
    pub y: f64,
}

/// One of the colored panels: a box overlay plus a circle/triangle layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub index: RegionIndex,
    pub color: Option<&'static str>,
    pub width_px: f64,
    pub height_px: f64,
    pub boxes: Vec<Marker>,
    pub circles: Vec<Marker>,
    pub triangles: Vec<Marker>,
}

impl Region {
    fn new(index: RegionIndex) -> Self {
        Self {
            index,
            color: None,
            width_px: FALLBACK_REGION_WIDTH_PX,
            height_px: FALLBACK_REGION_HEIGHT_PX,
            boxes: Vec::new(),
            circles: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Remove the circle with `id` if it is still on the panel.
    fn remove_circle(&mut self, id: MarkerId) -> bool {
        match self.circles.iter().position(|c| c.id == id) {
            Some(pos) => {
                self.circles.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Parameters read from the sliders when a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    pub box_target: u32,
    pub participation_rate: u32,
}

impl RunParams {
    pub fn new(box_target: u32, participation_rate: u32) -> Self {
        Self {
            box_target,
            participation_rate,
        }
    }

    /// Gate applied by the start control: both sliders must be non-zero and
    /// within the slider range.
    pub fn check_startable(&self) -> Result<(), SimError> {
        if self.box_target == 0 {
            return Err(SimError::ZeroBoxTarget);
        }
        if self.participation_rate == 0 {
            return Err(SimError::ZeroParticipationRate);
        }
        for (name, value) in [
            ("Vocational training", self.box_target),
            ("Participation rate", self.participation_rate),
        ] {
            if value > SLIDER_MAX {
                return Err(SimError::OutOfRange {
                    name,
                    value,
                    max: SLIDER_MAX,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    AlreadyRunning,
    ZeroBoxTarget,
    ZeroParticipationRate,
    OutOfRange {
        name: &'static str,
        value: u32,
        max: u32,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::AlreadyRunning => write!(f, "A simulation run is already in progress"),
            SimError::ZeroBoxTarget => write!(f, "Vocational training must be greater than zero"),
            SimError::ZeroParticipationRate => {
                write!(f, "Participation rate must be greater than zero")
            }
            SimError::OutOfRange { name, value, max } => {
                write!(f, "{} {} exceeds the maximum of {}", name, value, max)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Wall-clock duration of a run, split the way the readout shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElapsedTime {
    pub seconds: u64,
    pub millis: u32,
}

impl ElapsedTime {
    pub fn from_ms(elapsed_ms: f64) -> Self {
        let total = elapsed_ms.max(0.0).floor() as u64;
        Self {
            seconds: total / 1000,
            millis: (total % 1000) as u32,
        }
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s {}ms", self.seconds, self.millis)
    }
}

/// Progress of the current (or most recent) run.
#[derive(Debug, Clone)]
pub struct RunState {
    pub params: RunParams,
    pub circle_index: usize,
    pub box_index: u32,
    pub triangles_added: Vec<u32>,
    pub running: bool,
    pub started_at_ms: f64,
    pub interval_ms: f64,
    pub ticks: usize,
    /// Every circle on the stage when the run started, in panel order.
    snapshot: Vec<(RegionIndex, MarkerId)>,
}

impl RunState {
    pub fn total_circles(&self) -> usize {
        self.snapshot.len()
    }

    /// Both effects have run out of work.
    pub fn is_exhausted(&self) -> bool {
        self.box_index >= self.params.box_target && self.circle_index >= self.snapshot.len()
    }
}

/// What happened to the circle layer on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleWork {
    pub region: RegionIndex,
    /// Live circles in `region` before this tick touched it.
    pub live_before: usize,
    pub triangles_added: usize,
    /// Whether the snapshot circle for this index was still present.
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub circle: Option<CircleWork>,
    /// Box count per region after this tick, if the box layer grew.
    pub boxes: Option<u32>,
}

/// Final numbers of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub params: RunParams,
    pub ticks: usize,
    pub interval_ms: f64,
    pub elapsed: ElapsedTime,
    pub triangles_added: Vec<u32>,
    pub circles_swept: Vec<usize>,
    pub remaining_circles: Vec<usize>,
    pub boxes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// No run is active; nothing was done.
    Idle,
    Continue(TickReport),
    Finished(TickReport, RunSummary),
}

impl StepOutcome {
    pub fn tick(&self) -> Option<&TickReport> {
        match self {
            StepOutcome::Idle => None,
            StepOutcome::Continue(tick) | StepOutcome::Finished(tick, _) => Some(tick),
        }
    }
}

/// Issues markers with fresh ids at random positions.
#[derive(Debug)]
struct MarkerFactory {
    rng: StdRng,
    next_id: MarkerId,
}

impl MarkerFactory {
    fn issue(&mut self, x: f64, y: f64) -> Marker {
        let id = self.next_id;
        self.next_id += 1;
        Marker { id, x, y }
    }

    /// Percentage position inside the central 80% of a panel.
    fn scattered(&mut self) -> Marker {
        let x = MARKER_MARGIN_PCT + self.rng.random::<f64>() * MARKER_SPAN_PCT;
        let y = MARKER_MARGIN_PCT + self.rng.random::<f64>() * MARKER_SPAN_PCT;
        self.issue(x, y)
    }

    /// Pixel position inside a panel of the given size, inset so a box stays visible.
    fn inset(&mut self, width_px: f64, height_px: f64) -> Marker {
        let x = self.rng.random::<f64>() * (width_px - BOX_INSET_PX).max(0.0);
        let y = self.rng.random::<f64>() * (height_px - BOX_INSET_PX).max(0.0);
        self.issue(x, y)
    }
}

/// Owns the stage and drives a run one tick at a time.
///
/// The driver never looks at a clock itself: callers pass `now_ms` into
/// [`Driver::start`] and [`Driver::step`], and schedule `step` every
/// [`RunState::interval_ms`] until it reports [`StepOutcome::Finished`].
#[derive(Debug)]
pub struct Driver {
    regions: Vec<Region>,
    run: Option<RunState>,
    controls_enabled: bool,
    readout: Option<ElapsedTime>,
    markers: MarkerFactory,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            regions: (0..REGION_COUNT).map(Region::new).collect(),
            run: None,
            controls_enabled: true,
            readout: None,
            markers: MarkerFactory { rng, next_id: 0 },
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.running)
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Last elapsed-time value written; frozen once a run completes.
    pub fn readout(&self) -> Option<ElapsedTime> {
        self.readout
    }

    /// Record a panel's rendered size. Unknown indices are ignored.
    pub fn resize_region(&mut self, index: RegionIndex, width_px: f64, height_px: f64) {
        if let Some(region) = self.regions.get_mut(index) {
            region.width_px = width_px;
            region.height_px = height_px;
        }
    }

    /// Paint the panels and scatter a fresh batch of circles on each, then
    /// bring the box overlay to `params.box_target`.
    pub fn configure(&mut self, params: RunParams) -> Result<(), SimError> {
        if self.is_running() {
            warn!("Setup ignored while a run is in progress");
            return Err(SimError::AlreadyRunning);
        }

        for region in &mut self.regions {
            region.color = REGION_COLORS.get(region.index).copied();
            for _ in 0..CIRCLES_PER_REGION {
                let circle = self.markers.scattered();
                region.circles.push(circle);
            }
        }
        self.reconcile_box_count(params.box_target);

        info!(
            "Configured {} regions with {} circles each, {} boxes",
            self.regions.len(),
            CIRCLES_PER_REGION,
            params.box_target
        );
        Ok(())
    }

    /// Make every region hold exactly `n` boxes.
    ///
    /// Excess boxes are dropped from the end; missing ones are appended at
    /// random positions using the region's current size.
    pub fn reconcile_box_count(&mut self, n: u32) {
        let n = n as usize;
        for region in &mut self.regions {
            if region.boxes.len() > n {
                region.boxes.truncate(n);
            } else {
                while region.boxes.len() < n {
                    let boxed = self.markers.inset(region.width_px, region.height_px);
                    region.boxes.push(boxed);
                }
            }
        }
    }

    /// Begin a run and return the tick interval in milliseconds.
    ///
    /// Zero parameters are not rejected here; see [`RunParams::check_startable`].
    pub fn start(&mut self, params: RunParams, now_ms: f64) -> Result<f64, SimError> {
        if self.is_running() {
            warn!("Start ignored while a run is in progress");
            return Err(SimError::AlreadyRunning);
        }

        let snapshot: Vec<(RegionIndex, MarkerId)> = self
            .regions
            .iter()
            .flat_map(|r| r.circles.iter().map(move |c| (r.index, c.id)))
            .collect();
        let interval_ms = tick_interval_ms(
            snapshot.len(),
            params.box_target,
            params.participation_rate,
        );

        info!(
            "Starting run: {} circles, box target {}, participation {}%, tick every {:.2}ms",
            snapshot.len(),
            params.box_target,
            params.participation_rate,
            interval_ms
        );

        self.controls_enabled = false;
        self.readout = Some(ElapsedTime::default());
        self.run = Some(RunState {
            params,
            circle_index: 0,
            box_index: 0,
            triangles_added: vec![0; self.regions.len()],
            running: true,
            started_at_ms: now_ms,
            interval_ms,
            ticks: 0,
            snapshot,
        });
        Ok(interval_ms)
    }

    /// Termination predicate: true once the active run has no work left.
    pub fn is_exhausted(&self) -> bool {
        self.run.as_ref().is_some_and(RunState::is_exhausted)
    }

    /// Advance the active run by one tick.
    pub fn step(&mut self, now_ms: f64) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Idle;
        }
        let Some(mut run) = self.run.take() else {
            return StepOutcome::Idle;
        };

        let tick = TickReport {
            circle: self.advance_circles(&mut run),
            boxes: self.advance_boxes(&mut run),
        };
        run.ticks += 1;
        self.readout = Some(ElapsedTime::from_ms(now_ms - run.started_at_ms));

        debug!(
            "Tick {}: circle index {}/{}, box index {}/{}",
            run.ticks,
            run.circle_index,
            run.total_circles(),
            run.box_index,
            run.params.box_target
        );

        if !run.is_exhausted() {
            self.run = Some(run);
            return StepOutcome::Continue(tick);
        }

        run.running = false;
        self.controls_enabled = true;
        let circles_swept = self.sweep_leftover_circles(run.params.participation_rate);
        let summary = RunSummary {
            params: run.params,
            ticks: run.ticks,
            interval_ms: run.interval_ms,
            elapsed: self.readout.unwrap_or_default(),
            triangles_added: run.triangles_added.clone(),
            circles_swept,
            remaining_circles: self.regions.iter().map(|r| r.circles.len()).collect(),
            boxes: self.regions.iter().map(|r| r.boxes.len()).collect(),
        };
        self.run = Some(run);

        info!(
            "Run finished after {} ticks in {}; triangles added per region: {:?}",
            summary.ticks, summary.elapsed, summary.triangles_added
        );
        StepOutcome::Finished(tick, summary)
    }

    /// Start a run and step it to completion on a simulated clock that
    /// advances by one interval per tick.
    pub fn run_to_completion(
        &mut self,
        params: RunParams,
        start_ms: f64,
    ) -> Result<RunSummary, SimError> {
        let interval_ms = self.start(params, start_ms)?;
        let mut now_ms = start_ms;
        loop {
            now_ms += interval_ms;
            if let StepOutcome::Finished(_, summary) = self.step(now_ms) {
                return Ok(summary);
            }
        }
    }

    // The panel is picked by the circle index itself while the circle to
    // remove comes from the start-of-run snapshot, so the two can disagree.
    fn advance_circles(&mut self, run: &mut RunState) -> Option<CircleWork> {
        if run.circle_index >= run.snapshot.len() {
            return None;
        }
        let index = run.circle_index;
        run.circle_index += 1;

        let live_before = match self.regions.get(index) {
            Some(region) if !region.circles.is_empty() => region.circles.len(),
            _ => return None,
        };

        let (owner, circle_id) = run.snapshot[index];
        let removed = self
            .regions
            .get_mut(owner)
            .is_some_and(|r| r.remove_circle(circle_id));

        let count = (run.params.participation_rate as usize).min(live_before);
        let region = &mut self.regions[index];
        for _ in 0..count {
            let triangle = self.markers.scattered();
            region.triangles.push(triangle);
        }
        if let Some(total) = run.triangles_added.get_mut(index) {
            *total += count as u32;
        }

        Some(CircleWork {
            region: index,
            live_before,
            triangles_added: count,
            removed,
        })
    }

    fn advance_boxes(&mut self, run: &mut RunState) -> Option<u32> {
        if run.box_index >= run.params.box_target {
            return None;
        }
        self.reconcile_box_count(run.box_index + 1);
        run.box_index += 1;
        Some(run.box_index)
    }

    /// Remove up to `limit` circles from the front of every panel.
    fn sweep_leftover_circles(&mut self, limit: u32) -> Vec<usize> {
        self.regions
            .iter_mut()
            .map(|region| {
                let n = (limit as usize).min(region.circles.len());
                region.circles.drain(..n);
                n
            })
            .collect()
    }
}

/// Configure a seeded stage and run it to completion on a simulated clock.
pub fn headless_run(params: RunParams, seed: u64) -> Result<RunSummary, SimError> {
    params.check_startable()?;
    let mut driver = Driver::with_seed(seed);
    driver.configure(params)?;
    driver.run_to_completion(params, 0.0)
}

/// Headless run for scripted use from JavaScript.
///
/// Returns the serialized [`RunSummary`], or an error string.
#[wasm_bindgen]
pub fn simulate_run(box_target: u32, participation_rate: u32, seed: u64) -> JsValue {
    match headless_run(RunParams::new(box_target, participation_rate), seed) {
        Ok(summary) => serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL),
        Err(e) => serde_wasm_bindgen::to_value(&format!("Simulation failed: {}", e))
            .unwrap_or(JsValue::NULL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(seed: u64, params: RunParams) -> Driver {
        let mut driver = Driver::with_seed(seed);
        driver.configure(params).expect("configure");
        driver
    }

    #[test]
    fn reconcile_sets_exact_box_count_in_every_region() {
        let mut driver = Driver::with_seed(1);
        for n in [0, 7, 3, 12, 0] {
            driver.reconcile_box_count(n);
            assert!(driver.regions().iter().all(|r| r.boxes.len() == n as usize));
        }
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut driver = Driver::with_seed(2);
        driver.reconcile_box_count(9);
        let first: Vec<Vec<Marker>> = driver.regions().iter().map(|r| r.boxes.clone()).collect();
        driver.reconcile_box_count(9);
        let second: Vec<Vec<Marker>> = driver.regions().iter().map(|r| r.boxes.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn shrinking_keeps_the_oldest_boxes() {
        let mut driver = Driver::with_seed(3);
        driver.reconcile_box_count(5);
        let kept: Vec<Marker> = driver.regions()[0].boxes[..2].to_vec();
        driver.reconcile_box_count(2);
        assert_eq!(driver.regions()[0].boxes, kept);
    }

    #[test]
    fn boxes_stay_inside_the_inset_area() {
        let mut driver = Driver::with_seed(4);
        driver.resize_region(1, 50.0, 30.0);
        driver.resize_region(2, 5.0, 5.0);
        driver.reconcile_box_count(40);

        for b in &driver.regions()[1].boxes {
            assert!((0.0..40.0).contains(&b.x));
            assert!((0.0..20.0).contains(&b.y));
        }
        // A panel smaller than the inset pins boxes to the corner
        assert!(driver.regions()[2].boxes.iter().all(|b| b.x == 0.0 && b.y == 0.0));
    }

    #[test]
    fn configure_scatters_circles_in_central_area() {
        let driver = configured(5, RunParams::new(3, 10));
        for (region, color) in driver.regions().iter().zip(REGION_COLORS) {
            assert_eq!(region.color, Some(color));
            assert_eq!(region.circles.len(), CIRCLES_PER_REGION);
            assert_eq!(region.boxes.len(), 3);
            for c in &region.circles {
                assert!((10.0..90.0).contains(&c.x));
                assert!((10.0..90.0).contains(&c.y));
            }
        }
    }

    #[test]
    fn triangles_per_tick_are_bounded() {
        let params = RunParams::new(5, 30);
        let mut driver = configured(6, params);
        let interval = driver.start(params, 0.0).expect("start");

        let mut now = 0.0;
        loop {
            now += interval;
            let outcome = driver.step(now);
            if let Some(work) = outcome.tick().and_then(|t| t.circle) {
                assert!(work.triangles_added <= params.participation_rate as usize);
                assert!(work.triangles_added <= work.live_before);
            }
            if matches!(outcome, StepOutcome::Finished(..)) {
                break;
            }
        }
    }

    #[test]
    fn completed_run_reaches_both_bounds() {
        let params = RunParams::new(5, 10);
        let mut driver = configured(7, params);
        driver.run_to_completion(params, 1_000.0).expect("run");

        let run = driver.run().expect("run state");
        assert_eq!(run.circle_index, run.total_circles());
        assert_eq!(run.box_index, params.box_target);
        assert!(!run.running);
        assert!(driver.is_exhausted());
        assert!(!driver.is_running());
        assert!(driver.controls_enabled());
        assert_eq!(driver.step(99_999.0), StepOutcome::Idle);
    }

    #[test]
    fn four_by_hundred_scenario() {
        let params = RunParams::new(5, 10);
        let mut driver = configured(8, params);
        let summary = driver.run_to_completion(params, 0.0).expect("run");

        assert_eq!(summary.ticks, 400);
        assert!((summary.interval_ms - 750.0).abs() < 1e-9);
        assert_eq!(summary.boxes, vec![5; 4]);
        assert!(summary.triangles_added.iter().all(|&t| t <= 100));
        assert!(summary.circles_swept.iter().all(|&n| n <= 10));
        // Only the first four indices address a panel; each spawns 10 triangles
        assert_eq!(summary.triangles_added, vec![10, 10, 10, 10]);
        // and removes one of panel 0's circles from the snapshot
        assert_eq!(summary.remaining_circles, vec![86, 90, 90, 90]);
        for (region, &added) in driver.regions().iter().zip(&summary.triangles_added) {
            assert_eq!(region.triangles.len(), added as usize);
        }
    }

    #[test]
    fn box_target_drives_length_when_larger() {
        let params = RunParams::new(10, 50);
        let mut driver = Driver::with_seed(9);
        let summary = driver.run_to_completion(params, 0.0).expect("run");
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.boxes, vec![10; 4]);
        assert_eq!(summary.triangles_added, vec![0; 4]);
    }

    #[test]
    fn boxes_grow_one_per_tick() {
        let params = RunParams::new(3, 10);
        let mut driver = configured(10, params);
        driver.reconcile_box_count(0);
        driver.start(params, 0.0).expect("start");

        let grown: Vec<Option<u32>> = (1..=4)
            .map(|t| driver.step(t as f64).tick().and_then(|tick| tick.boxes))
            .collect();
        assert_eq!(grown, vec![Some(1), Some(2), Some(3), None]);
    }

    #[test]
    fn start_is_rejected_while_running() {
        let params = RunParams::new(2, 10);
        let mut driver = configured(11, params);
        driver.start(params, 0.0).expect("start");
        assert!(!driver.controls_enabled());
        assert_eq!(driver.start(params, 5.0), Err(SimError::AlreadyRunning));
        assert_eq!(driver.configure(params), Err(SimError::AlreadyRunning));
    }

    #[test]
    fn zero_slider_blocks_start() {
        assert_eq!(
            RunParams::new(0, 10).check_startable(),
            Err(SimError::ZeroBoxTarget)
        );
        assert_eq!(
            RunParams::new(5, 0).check_startable(),
            Err(SimError::ZeroParticipationRate)
        );
        assert!(RunParams::new(5, 10).check_startable().is_ok());

        let driver = Driver::with_seed(12);
        assert!(!driver.is_running());
        assert!(driver.run().is_none());
    }

    #[test]
    fn readout_tracks_ticks_then_freezes() {
        let params = RunParams::new(1, 100);
        let mut driver = Driver::with_seed(13);
        driver.start(params, 10_000.0).expect("start");
        assert_eq!(driver.readout(), Some(ElapsedTime::default()));

        let outcome = driver.step(12_345.0);
        assert!(matches!(outcome, StepOutcome::Finished(..)));
        let frozen = ElapsedTime {
            seconds: 2,
            millis: 345,
        };
        assert_eq!(driver.readout(), Some(frozen));

        driver.step(20_000.0);
        assert_eq!(driver.readout(), Some(frozen));
    }

    #[test]
    fn elapsed_time_formats_seconds_and_millis() {
        assert_eq!(ElapsedTime::from_ms(0.0).to_string(), "0s 0ms");
        assert_eq!(ElapsedTime::from_ms(30_007.9).to_string(), "30s 7ms");
        assert_eq!(ElapsedTime::from_ms(-5.0).to_string(), "0s 0ms");
    }

    #[test]
    fn sweep_removes_from_the_front() {
        let params = RunParams::new(1, 3);
        let mut driver = configured(14, params);
        // Panel 3 is only ever touched by the final sweep
        let survivors: Vec<Marker> = driver.regions()[3].circles[3..].to_vec();
        let summary = driver.run_to_completion(params, 0.0).expect("run");
        assert_eq!(summary.circles_swept, vec![3; 4]);
        assert_eq!(driver.regions()[3].circles, survivors);
    }

    #[test]
    fn full_participation_sweeps_everything_left() {
        let params = RunParams::new(1, 100);
        let mut driver = configured(16, params);
        driver.run_to_completion(params, 0.0).expect("run");
        assert!(driver.regions().iter().all(|r| r.circles.is_empty()));
    }

    #[test]
    fn summary_serializes_for_the_host_page() {
        let params = RunParams::new(2, 25);
        let mut driver = configured(15, params);
        let summary = driver.run_to_completion(params, 0.0).expect("run");

        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["params"]["box_target"], 2);
        assert_eq!(json["ticks"], 400);
        assert_eq!(json["boxes"].as_array().map(Vec::len), Some(4));

        let back: RunSummary = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, summary);
    }

    #[test]
    fn headless_run_is_reproducible_per_seed() {
        let params = RunParams::new(4, 20);
        let a = headless_run(params, 42).expect("run");
        let b = headless_run(params, 42).expect("run");
        assert_eq!(a, b);
        assert_eq!(a.triangles_added, vec![20; 4]);
    }

    #[test]
    fn headless_run_rejects_zero_sliders() {
        assert_eq!(
            headless_run(RunParams::new(0, 20), 1),
            Err(SimError::ZeroBoxTarget)
        );
        assert_eq!(
            headless_run(RunParams::new(4, 0), 1),
            Err(SimError::ZeroParticipationRate)
        );
    }

    #[test]
    fn oversized_parameters_are_rejected_before_allocating() {
        assert_eq!(
            RunParams::new(u32::MAX, 1).check_startable(),
            Err(SimError::OutOfRange {
                name: "Vocational training",
                value: u32::MAX,
                max: SLIDER_MAX,
            })
        );
        assert_eq!(
            headless_run(RunParams::new(4, SLIDER_MAX + 1), 1),
            Err(SimError::OutOfRange {
                name: "Participation rate",
                value: SLIDER_MAX + 1,
                max: SLIDER_MAX,
            })
        );
        assert!(RunParams::new(SLIDER_MAX, SLIDER_MAX).check_startable().is_ok());
    }

    #[test]
    fn empty_panel_only_advances_the_circle_index() {
        let params = RunParams::new(1, 10);
        let mut driver = configured(17, params);
        driver.regions[1].circles.clear();
        driver.start(params, 0.0).expect("start");

        let first = driver.step(1.0);
        assert_eq!(first.tick().and_then(|t| t.circle).map(|w| w.region), Some(0));

        let second = driver.step(2.0);
        assert_eq!(
            second.tick(),
            Some(&TickReport {
                circle: None,
                boxes: None,
            })
        );
        let run = driver.run().expect("run state");
        assert_eq!(run.circle_index, 2);
        assert_eq!(run.triangles_added, vec![10, 0, 0, 0]);
        assert!(driver.regions()[1].triangles.is_empty());
        // Snapshot circle 1 belongs to panel 0 and is left alone
        assert_eq!(driver.regions()[0].circles.len(), 99);
    }

    #[test]
    fn missing_snapshot_circle_still_spawns_triangles() {
        let params = RunParams::new(1, 10);
        let mut driver = configured(18, params);
        driver.start(params, 0.0).expect("start");

        // Snapshot circle 2 lives on panel 0; take it away before its tick
        let gone = driver.run.as_ref().expect("run state").snapshot[2];
        assert_eq!(gone.0, 0);
        assert!(driver.regions[0].remove_circle(gone.1));

        driver.step(1.0);
        driver.step(2.0);
        let third = driver.step(3.0);
        assert_eq!(
            third.tick().and_then(|t| t.circle),
            Some(CircleWork {
                region: 2,
                live_before: 100,
                triangles_added: 10,
                removed: false,
            })
        );
        let run = driver.run().expect("run state");
        assert_eq!(run.circle_index, 3);
        assert_eq!(run.triangles_added, vec![10, 10, 10, 0]);
        // Removed by ticks 0 and 1 plus the one taken out by hand
        assert_eq!(driver.regions()[0].circles.len(), 97);
        assert_eq!(driver.regions()[2].circles.len(), 100);
    }
}
