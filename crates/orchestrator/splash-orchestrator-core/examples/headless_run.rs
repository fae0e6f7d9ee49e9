use serde_json::to_string_pretty;
use splash_animation_core::{ElementRole, VisualElement};
use splash_orchestrator::{LoadingOverlay, OverlayStatus, TriggerOutcome};

fn main() -> anyhow::Result<()> {
    let mut overlay = LoadingOverlay::new(|| println!("overlay finished; show main content"));

    // Mount the overlay's elements as a host would during its first render
    overlay.register(VisualElement::new(ElementRole::Container))?;
    overlay.register(VisualElement::new(ElementRole::Logo))?;
    overlay.register(VisualElement::new(ElementRole::ProgressBar))?;
    for _ in 0..3 {
        overlay.register(VisualElement::new(ElementRole::Dot))?;
    }
    for _ in 0..12 {
        overlay.register(VisualElement::new(ElementRole::Particle))?;
    }

    if overlay.trigger()? != TriggerOutcome::Started {
        return Ok(());
    }

    let mut frames = 0;
    while overlay.status() == OverlayStatus::Running {
        let frame = overlay.step(1.0 / 60.0)?;
        if !frame.events.is_empty() {
            println!("t={:.3}\n{}", frame.time, to_string_pretty(&frame.events)?);
        }
        frames += 1;
    }
    println!("{frames} frames");
    Ok(())
}
