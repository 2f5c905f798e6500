use log::warn;
use vocational_training::utils::parse_slider_value;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the current value of a range slider and the callback feeding it.
#[derive(Clone, PartialEq)]
pub struct SliderState {
    /// The last successfully parsed slider position.
    pub value: u32,
    /// Callback for the slider's `oninput` event.
    pub oninput: Callback<InputEvent>,
}

/// Custom hook to manage state for a range slider.
///
/// Input that fails to parse leaves the previous value in place.
#[hook]
pub fn use_slider(initial_value: u32) -> SliderState {
    let value_handle: UseStateHandle<u32> = use_state(|| initial_value);

    let oninput = {
        let value_setter = value_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match parse_slider_value(&input.value()) {
                Ok(parsed) => value_setter.set(parsed),
                Err(err) => warn!("Ignoring slider input: {}", err),
            }
        })
    };

    SliderState {
        value: *value_handle,
        oninput,
    }
}
