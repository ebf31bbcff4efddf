use event_horizon::bloom::BloomChain;
use event_horizon::scene::Scene;
use event_horizon::Config;

#[test]
fn resize_updates_camera_and_viewport() {
    let mut scene = Scene::new(&Config::default(), 1920, 1080);
    assert!((scene.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);

    scene.resize(1080, 1920);
    assert!((scene.camera.aspect - 1080.0 / 1920.0).abs() < 1e-6);
    assert_eq!(scene.viewport(), (1080, 1920));
    assert_eq!(scene.frame().viewport, (1080, 1920));
}

#[test]
fn resize_changes_the_projection() {
    let mut scene = Scene::new(&Config::default(), 1000, 1000);
    let before = scene.frame().projection;
    scene.resize(2000, 1000);
    let after = scene.frame().projection;
    assert!((before.x_axis.x / after.x_axis.x - 2.0).abs() < 1e-5);
}

#[test]
fn composer_chain_follows_the_drawing_size() {
    let mut chain = BloomChain::new(1920, 1080);
    assert!(chain.resize(800, 600));
    assert_eq!(chain.size(), (800, 600));
    assert_eq!(chain.bright_size(), (400, 300));
    assert_eq!(chain.mips()[4], (25, 19));
}

#[test]
fn frames_follow_elapsed_time() {
    let mut scene = Scene::new(&Config::default(), 800, 600);
    scene.advance(5.0);
    let frame = scene.frame();
    assert_eq!(frame.time, 5.0);
    assert!((scene.particle_angle() + 0.5).abs() < 1e-6);
    assert!((scene.star_angle() - 0.1).abs() < 1e-6);
}
