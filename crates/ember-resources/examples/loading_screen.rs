//! A loading screen driven by the frame loop.
//!
//! Queues a handful of resources against in-memory services and ticks the
//! loader from a ~60 FPS loop, printing progress as it goes.
//!
//! Run with `RUST_LOG=ember_resources=trace` to see every tick.

use std::borrow::Cow;
use std::thread;
use std::time::Duration;

use ember_core::{logging, profiling, time::FrameClock};
use ember_resources::{
    LoadContext, LoadProgress, LoadReport, LoaderConfig, LoaderEvent, LoaderListener,
    ResourceLoader, ResourceResult, TaskFailure,
};
use ember_test_utils::FakeServices;

const KEY: u8 = 0x2f;

fn xor(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| b ^ KEY).collect()
}

fn xor_decrypt(data: &[u8]) -> Option<Cow<'_, [u8]>> {
    Some(Cow::Owned(xor(data)))
}

struct LoadingBar;

impl LoaderListener for LoadingBar {
    fn on_progress(&mut self, progress: LoadProgress) {
        let filled = (progress.fraction() * 20.0).round() as usize;
        println!(
            "[{}{}] {}/{}",
            "#".repeat(filled),
            " ".repeat(20 - filled),
            progress.completed,
            progress.total
        );
    }

    fn on_task_failed(&mut self, failure: &TaskFailure) {
        println!("  ! {} '{}': {}", failure.kind, failure.resource, failure.error);
    }

    fn on_done(&mut self, report: &LoadReport) {
        println!(
            "done: {} loaded, {} failed",
            report.succeeded(),
            report.failed
        );
    }
}

fn services() -> FakeServices {
    FakeServices::new()
        .with_file("strings/en.xml", b"<resources/>".to_vec())
        .with_file("background.png", b"IMGbackground".to_vec())
        .with_file("logo.png", xor(b"IMGlogo"))
        .with_file("hero.png", xor(b"IMGhero"))
        .with_atlas(
            "hero.plist",
            "hero.png",
            &["hero_run_1.png", "hero_run_2.png", "hero_run_3.png", "hero_run_4.png"],
        )
        .with_file("click.wav", b"RIFF".to_vec())
        .with_file("title.ogg", b"OggS".to_vec())
}

fn queue(loader: &mut ResourceLoader) -> ResourceResult<()> {
    loader
        .add_android_string_task("en", "strings/en.xml", false)
        .add_image_task("background.png", None)
        .add_encrypted_image_task("logo.png", Some(xor_decrypt), None)
        .add_encrypted_zwoptex_task("hero.plist", "hero.png", Some(xor_decrypt), None);
    loader.add_zwoptex_anim_task(
        "hero_run",
        Duration::from_millis(80),
        "hero_run_%d.png",
        1,
        4,
        false,
        None,
    )?;
    loader
        .add_cd_effect_task("click.wav", None)
        // Missing on purpose: the run reports it and carries on.
        .add_cd_effect_task("missing.wav", None)
        .add_cd_music_task("title.ogg", Some(Duration::ZERO));
    Ok(())
}

fn main() -> ResourceResult<()> {
    logging::init();
    profiling::set_enabled(true);

    let services = services();
    let ctx = LoadContext::from_services(&services);

    let config = LoaderConfig::new()
        .with_start_delay(Duration::from_millis(100))
        .with_default_idle(Duration::from_millis(50));
    let mut loader = ResourceLoader::with_config(config).with_listener(LoadingBar);
    queue(&mut loader)?;

    let mut handle = loader.run();
    let mut clock = FrameClock::new();

    loop {
        profiling::new_frame();
        let delta = clock.update();

        let result = handle.tick(delta, &ctx);
        for event in handle.drain_events() {
            if let LoaderEvent::TaskExecuted { index, .. } = event {
                tracing::debug!("frame {}: task {} ran", clock.frame_count(), index);
            }
        }
        if result.is_terminal() {
            break;
        }

        thread::sleep(Duration::from_millis(16));
    }

    tracing::info!(
        "loading took {:.2}s over {} frames",
        clock.elapsed().as_secs_f32(),
        clock.frame_count()
    );
    Ok(())
}
