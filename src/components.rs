//! Pure Yew view components for the simulation page.
//!
//! Everything here renders from props; the driver and timer live in `main.rs`.

use vocational_training::config::{SLIDER_MAX, SLIDER_MIN};
use vocational_training::{ElapsedTime, Marker, Region};
use yew::prelude::*;

fn px_style(marker: &Marker) -> String {
    format!("left: {:.1}px; top: {:.1}px;", marker.x, marker.y)
}

fn pct_style(marker: &Marker) -> String {
    format!("left: {:.2}%; top: {:.2}%;", marker.x, marker.y)
}

/// One colored panel with its box overlay and circle/triangle layer.
#[derive(Properties, PartialEq)]
pub struct RegionPanelProps {
    pub region: Region,
    pub node_ref: NodeRef,
}

#[function_component(RegionPanel)]
pub fn region_panel(props: &RegionPanelProps) -> Html {
    let region = &props.region;
    let style = region
        .color
        .map(|color| format!("background-color: {};", color))
        .unwrap_or_default();

    html! {
        <div class="section" ref={props.node_ref.clone()} {style}>
            { region.boxes.iter().map(|b| html! {
                <div key={b.id} class="black-box" style={px_style(b)} />
            }).collect::<Html>() }
            <div class="circle-container">
                { region.circles.iter().map(|c| html! {
                    <div key={c.id} class="circle" style={pct_style(c)} />
                }).collect::<Html>() }
                { region.triangles.iter().map(|t| html! {
                    <div key={t.id} class="triangle" style={pct_style(t)} />
                }).collect::<Html>() }
            </div>
        </div>
    }
}

/// Labelled range slider showing its current value.
#[derive(Properties, PartialEq)]
pub struct ParameterSliderProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub value: u32,
    pub disabled: bool,
    pub oninput: Callback<InputEvent>,
}

#[function_component(ParameterSlider)]
pub fn parameter_slider(props: &ParameterSliderProps) -> Html {
    html! {
        <div class="form-group">
            <label for={props.id.clone()}>{ props.label.clone() }</label>
            <div class="slider-with-value">
                <input type="range"
                    id={props.id.clone()}
                    min={SLIDER_MIN.to_string()}
                    max={SLIDER_MAX.to_string()}
                    step="1"
                    value={props.value.to_string()}
                    disabled={props.disabled}
                    oninput={props.oninput.clone()}
                />
                <span class="slider-value">{ props.value }</span>
            </div>
        </div>
    }
}

/// Setup, Start and Reset buttons.
#[derive(Properties, PartialEq)]
pub struct ControlBarProps {
    pub setup_disabled: bool,
    pub start_disabled: bool,
    pub on_setup: Callback<MouseEvent>,
    pub on_start: Callback<MouseEvent>,
    pub on_reset: Callback<MouseEvent>,
}

#[function_component(ControlBar)]
pub fn control_bar(props: &ControlBarProps) -> Html {
    html! {
        <div class="button-row">
            <button id="setupButton" class="btn-secondary"
                disabled={props.setup_disabled}
                onclick={props.on_setup.clone()}>
                { "Setup" }
            </button>
            <button id="startButton" class="btn-primary"
                disabled={props.start_disabled}
                onclick={props.on_start.clone()}>
                { "Start" }
            </button>
            <button id="resetButton" class="btn-secondary"
                onclick={props.on_reset.clone()}>
                { "Reset" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ElapsedFieldProps {
    pub readout: Option<ElapsedTime>,
}

#[function_component(ElapsedField)]
pub fn elapsed_field(props: &ElapsedFieldProps) -> Html {
    let text = props.readout.map(|t| t.to_string()).unwrap_or_default();
    html! {
        <div class="form-group">
            <label for="simulationTime">{ "Simulation Time:" }</label>
            <input type="text" id="simulationTime" readonly={true} value={text} />
        </div>
    }
}
