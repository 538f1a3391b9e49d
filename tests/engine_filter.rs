mod common;

use std::time::Duration;

use common::{
    dispatcher, recorder, settle, wait_until, BarInput, BarOutput, BarViewModel, FooInput,
    FooOutput, FooViewModel, Latch, StreamInput, StreamViewModel,
};

fn foo_state() -> FooOutput {
    FooOutput::State(5, "Foo".to_string())
}

#[test]
fn filtered_input_is_single_flight() {
    let (_runtime, dispatcher) = dispatcher();
    let latch = Latch::closed();
    let view_model = FooViewModel::new(latch.clone());
    let accepted = view_model.accepted.clone();
    let (outputs, sink) = recorder();
    let interface = dispatcher.interface(view_model, sink);

    interface.send(FooInput::DidTapButton);
    interface.send(FooInput::DidTapButton);
    wait_until("first tap accepted", || accepted.count() == 1);
    settle(Duration::from_millis(100));
    assert_eq!(accepted.count(), 1);
    assert!(!interface.is_idle());

    latch.release();
    wait_until("button loaded", || outputs.lock().len() == 2);
    assert_eq!(
        *outputs.lock(),
        vec![foo_state(), FooOutput::Loaded("button".to_string())]
    );

    // Dropped, not queued: nothing else arrives.
    settle(Duration::from_millis(100));
    assert_eq!(accepted.count(), 1);

    interface.send(FooInput::DidTapButton);
    wait_until("second tap accepted", || accepted.count() == 2);
}

#[test]
fn unfiltered_inputs_are_never_gated() {
    let (_runtime, dispatcher) = dispatcher();
    let latch = Latch::closed();
    let view_model = FooViewModel::new(latch.clone());
    let accepted = view_model.accepted.clone();
    let (outputs, sink) = recorder();
    let interface = dispatcher.interface(view_model, sink);

    interface.send(FooInput::DidTapButton);
    interface.send(FooInput::DidTapPlain);
    interface.send(FooInput::DidTapPlain);

    wait_until("plain taps delivered", || outputs.lock().len() == 3);
    assert_eq!(accepted.count_of("DidTapPlain"), 2);
    assert_eq!(
        *outputs.lock(),
        vec![foo_state(), FooOutput::Done, FooOutput::Done]
    );
}

#[test]
fn filter_all_inputs_blocks_every_kind_while_in_flight() {
    let (_runtime, dispatcher) = dispatcher();
    let latch = Latch::closed();
    let view_model = FooViewModel::new(latch.clone());
    let accepted = view_model.accepted.clone();
    let (outputs, sink) = recorder();
    let interface = dispatcher.interface(view_model, sink);

    interface.send(FooInput::DidTapOtherButton);
    interface.send(FooInput::DidTapButton);
    interface.send(FooInput::DidTapPlain);
    interface.send(FooInput::DidTapOtherButton);

    settle(Duration::from_millis(500));
    assert_eq!(accepted.all(), vec!["DidTapOtherButton"]);

    latch.release();
    wait_until("other button loaded", || outputs.lock().len() == 2);
    assert_eq!(
        *outputs.lock(),
        vec![foo_state(), FooOutput::Loaded("other".to_string())]
    );

    // Previously dropped kinds go through fresh.
    interface.send(FooInput::DidTapPlain);
    wait_until("plain tap delivered", || outputs.lock().len() == 3);
    assert_eq!(accepted.count(), 2);
}

#[test]
fn filter_all_allows_one_accept_at_a_time() {
    let (_runtime, dispatcher) = dispatcher();
    let latch = Latch::closed();
    let view_model = BarViewModel::new(latch.clone());
    let accepted = view_model.accepted.clone();
    let (outputs, sink) = recorder();
    let interface = dispatcher.interface(view_model, sink);

    interface.send(BarInput::DidTapSaveButton);
    interface.send(BarInput::DidTapEditButton);
    interface.send(BarInput::DidTapSaveButton);
    settle(Duration::from_millis(200));
    assert_eq!(accepted.all(), vec!["DidTapSaveButton"]);

    latch.release();
    wait_until("saved", || outputs.lock().len() == 2);

    interface.send(BarInput::DidTapEditButton);
    wait_until("edit failed", || outputs.lock().len() == 3);
    assert_eq!(
        *outputs.lock(),
        vec![
            BarOutput::State("Bar".to_string()),
            BarOutput::Saved,
            BarOutput::ShowError("fake failure".to_string()),
        ]
    );
}

#[test]
fn filtered_output_keeps_input_in_flight() {
    let (_runtime, dispatcher) = dispatcher();
    let latch = Latch::closed();
    let view_model = FooViewModel::new(latch.clone());
    let accepted = view_model.accepted.clone();
    let (outputs, sink) = recorder();
    let interface = dispatcher.interface(view_model, sink);

    interface.send(FooInput::DidTapProgress);
    wait_until("progress delivered", || outputs.lock().len() == 2);

    interface.send(FooInput::DidTapProgress);
    settle(Duration::from_millis(100));
    assert_eq!(accepted.count(), 1);
    assert!(!interface.is_idle());

    latch.release();
    wait_until("done delivered", || outputs.lock().len() == 3);
    assert_eq!(
        *outputs.lock(),
        vec![foo_state(), FooOutput::Progress(50), FooOutput::Done]
    );

    interface.send(FooInput::DidTapProgress);
    wait_until("progress accepted again", || accepted.count() == 2);
}

#[test]
fn accept_without_outputs_still_clears_marker() {
    let (_runtime, dispatcher) = dispatcher();
    let view_model = FooViewModel::new(Latch::open());
    let accepted = view_model.accepted.clone();
    let (_outputs, sink) = recorder();
    let interface = dispatcher.interface(view_model, sink);

    interface.send(FooInput::DidTapSilent);
    wait_until("silent tap finished", || {
        accepted.count() == 1 && interface.is_idle()
    });

    interface.send(FooInput::DidTapSilent);
    wait_until("silent tap accepted again", || accepted.count() == 2);
}

#[test]
fn panicking_accept_clears_marker() {
    let (_runtime, dispatcher) = dispatcher();
    let view_model = StreamViewModel::new(Latch::open());
    let accepted = view_model.accepted.clone();
    let (outputs, sink) = recorder();
    let interface = dispatcher.interface(view_model, sink);

    interface.send(StreamInput::Panic);
    wait_until("panic cleaned up", || {
        accepted.count() == 1 && interface.is_idle()
    });

    interface.send(StreamInput::Panic);
    wait_until("panic accepted again", || accepted.count() == 2);
    assert!(outputs.lock().is_empty());
}
