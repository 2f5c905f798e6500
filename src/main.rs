//! Main module for the Vocational Training simulation using Yew.
//! Wires the driver, the tick timer and the controls to the view components.

use gloo_timers::callback::Interval;
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use vocational_training::{config::*, Driver, RunParams, StepOutcome};
use web_sys::Element;
use yew::prelude::*;

mod components;
mod hooks;

use components::{ControlBar, ElapsedField, ParameterSlider, RegionPanel};
use hooks::use_slider;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Copy each panel's rendered size into the driver so boxes land inside it.
fn measure_panels(driver: &mut Driver, panels: &[NodeRef]) {
    for (index, panel) in panels.iter().enumerate() {
        if let Some(el) = panel.cast::<Element>() {
            driver.resize_region(index, el.client_width() as f64, el.client_height() as f64);
        }
    }
}

/// Start a run and schedule its ticks.
///
/// The interval handle is stored in `ticker`; clearing it stops the timer.
fn launch_run(
    driver: Rc<RefCell<Driver>>,
    panels: Rc<Vec<NodeRef>>,
    params: RunParams,
    ticker: UseStateHandle<Option<Interval>>,
    redraw: UseForceUpdateHandle,
) {
    if let Err(e) = params.check_startable() {
        warn!("Start rejected: {}", e);
        return;
    }

    let interval_ms = {
        let mut d = driver.borrow_mut();
        measure_panels(&mut d, &panels);
        match d.start(params, js_sys::Date::now()) {
            Ok(ms) => ms,
            Err(e) => {
                warn!("Start rejected: {}", e);
                return;
            }
        }
    };

    let ticker_clone = ticker.clone();
    let redraw_clone = redraw.clone();
    // setInterval truncates fractional delays the same way
    let handle = Interval::new(interval_ms as u32, move || {
        let outcome = {
            let mut d = driver.borrow_mut();
            measure_panels(&mut d, &panels);
            d.step(js_sys::Date::now())
        };
        if let StepOutcome::Finished(_, summary) = outcome {
            info!(
                "Swept leftover circles per region: {:?}",
                summary.circles_swept
            );
            ticker_clone.set(None);
        }
        redraw_clone.force_update();
    });
    ticker.set(Some(handle));
    redraw.force_update();
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, timer and UI elements.
#[function_component(App)]
fn app() -> Html {
    let driver = use_mut_ref(Driver::new);
    let panels = use_memo((), |_| {
        (0..REGION_COUNT)
            .map(|_| NodeRef::default())
            .collect::<Vec<_>>()
    });
    let ticker = use_state(|| None::<Interval>);
    let redraw = use_force_update();

    let box_slider = use_slider(DEFAULT_BOX_TARGET);
    let rate_slider = use_slider(DEFAULT_PARTICIPATION_RATE);

    // Measure the panels once they exist and start from an empty overlay
    {
        let driver = driver.clone();
        let panels = panels.clone();
        let redraw = redraw.clone();
        use_effect_with((), move |_| {
            let mut d = driver.borrow_mut();
            measure_panels(&mut d, &panels);
            d.reconcile_box_count(0);
            drop(d);
            redraw.force_update();
        });
    }

    let params = RunParams::new(box_slider.value, rate_slider.value);

    let on_setup = {
        let driver = driver.clone();
        let panels = panels.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            let mut d = driver.borrow_mut();
            measure_panels(&mut d, &panels);
            if let Err(e) = d.configure(params) {
                warn!("Setup rejected: {}", e);
            }
            drop(d);
            redraw.force_update();
        })
    };

    let on_start = {
        let driver = driver.clone();
        let panels = panels.clone();
        let ticker = ticker.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            launch_run(
                driver.clone(),
                panels.clone(),
                params,
                ticker.clone(),
                redraw.clone(),
            );
        })
    };

    let on_reset = Callback::from(|_: MouseEvent| {
        if let Err(e) = gloo_utils::window().location().reload() {
            warn!("Page reload failed: {:?}", e);
        }
    });

    let d = driver.borrow();
    let controls_enabled = d.controls_enabled();
    let start_disabled = !controls_enabled || params.check_startable().is_err();

    html! {
        <div class="container">
            <h1>{ "Vocational Training" }</h1>

            <div class="control-panel">
                <ParameterSlider
                    id="vocationalTraining"
                    label="Vocational Training:"
                    value={box_slider.value}
                    disabled={!controls_enabled}
                    oninput={box_slider.oninput.clone()}
                />
                <ParameterSlider
                    id="participationRate"
                    label="Participation Rate:"
                    value={rate_slider.value}
                    disabled={!controls_enabled}
                    oninput={rate_slider.oninput.clone()}
                />
                <ControlBar
                    setup_disabled={!controls_enabled}
                    {start_disabled}
                    {on_setup}
                    {on_start}
                    {on_reset}
                />
                <ElapsedField readout={d.readout()} />
            </div>

            <div class="sections">
                { d.regions().iter().zip(panels.iter()).map(|(region, node_ref)| html! {
                    <RegionPanel
                        key={region.index}
                        region={region.clone()}
                        node_ref={node_ref.clone()}
                    />
                }).collect::<Html>() }
            </div>
        </div>
    }
}

/// Entry point: initializes the Yew renderer for the App component.
fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
