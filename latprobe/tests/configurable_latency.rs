use latprobe::{ChannelConfiguration, LatencyRange, ProbeConfig, ProbeWorld};
use std::time::Duration;

fn quick_probe() -> ProbeConfig {
    ProbeConfig {
        tick_budget: 10,
        tick_interval: Duration::from_millis(10),
        replication_target: 10,
        bounce_target: 20,
    }
}

#[test]
fn fast_local_stays_near_the_tick_floor() {
    let mut world = ProbeWorld::new_with_config(ChannelConfiguration::fast_local(), quick_probe());
    world.request_start();
    world.request_enable("fast");
    world.run_until_empty();

    // Ten ticks of 10 ms dominate; the channels add microseconds.
    let sim_time = world.current_time();
    assert!(
        sim_time < Duration::from_millis(110),
        "fast local should stay near 100 ms of tick time, got {sim_time:?}"
    );
}

#[test]
fn wan_simulation_adds_visible_channel_time() {
    let mut world = ProbeWorld::new_with_config_and_seed(
        ChannelConfiguration::wan_simulation(),
        quick_probe(),
        3,
    );
    world.request_start();
    world.request_enable("wan");
    world.run_until_empty();

    // Arm delivery, the final replication, and 20 ping-pong hops all cross
    // channels at 40-60 ms each.
    let sim_time = world.current_time();
    assert!(
        sim_time > Duration::from_millis(100 + 20 * 40),
        "wan simulation should be dominated by channel latency, got {sim_time:?}"
    );
}

#[test]
fn custom_fixed_latency_is_exact() {
    let channels = ChannelConfiguration {
        call_latency: LatencyRange::fixed(Duration::from_millis(25)),
        replication_latency: LatencyRange::fixed(Duration::from_millis(5)),
    };
    let mut world = ProbeWorld::new_with_config(channels, quick_probe());
    world.request_start();
    world.request_enable("custom");
    world.run_until_empty();

    // Arm at 25 ms, ten ticks of 10 ms, final replication at 5 ms.
    let elapsed = world.replication_elapsed().expect("measurement complete");
    assert_eq!(elapsed, Duration::from_millis(25 + 100 + 5));
}

#[test]
fn jitter_varies_between_seeds() {
    let run = |seed: u64| {
        let channels = ChannelConfiguration {
            call_latency: LatencyRange::new(Duration::from_millis(10), Duration::from_millis(30)),
            replication_latency: LatencyRange::new(
                Duration::from_millis(10),
                Duration::from_millis(30),
            ),
        };
        let mut world = ProbeWorld::new_with_config_and_seed(channels, quick_probe(), seed);
        world.start_ping_pong();
        world.run_until_empty();
        world.current_time()
    };

    let times: Vec<Duration> = (0..5).map(run).collect();
    let all_equal = times.windows(2).all(|pair| pair[0] == pair[1]);
    assert!(
        !all_equal,
        "20 jittered hops per run should not produce identical totals: {times:?}"
    );
}
