use anyhow::Result;
use people_counter::*;

fn centered_at(x: i32, y: i32) -> BoundingBox {
    BoundingBox::new(x - 8, y - 16, x + 8, y + 16)
}

#[test]
fn person_leaving_downwards() -> Result<()> {
    let mut counter = PeopleCounter::new(Some(30.0));

    counter.update(vec![centered_at(50, 50)])?;
    assert_eq!(counter.tracks().map(Track::track_id).collect::<Vec<_>>(), vec![0]);

    counter.update(vec![centered_at(50, 80)])?;
    let history = counter
        .track_store()
        .get(0)
        .map(|track| track.history().to_vec())
        .unwrap_or_default();
    assert_eq!(history, vec![centered_at(50, 50), centered_at(50, 80)]);

    let update = counter.update(vec![])?;
    assert_eq!(update.finished.len(), 1);
    assert_eq!(update.finished[0].direction, Direction::Down);

    assert_eq!(counter.total_down(), 1);
    assert_eq!(counter.total_up(), 0);
    assert_eq!(counter.total(), 1);
    Ok(())
}

#[test]
fn nearer_later_track_loses_contested_box() -> Result<()> {
    let mut counter = PeopleCounter::new(Some(30.0));
    counter.update(vec![centered_at(100, 100), centered_at(105, 100)])?;

    // nearer to the second track (1px vs 4px) but the first track qualifies and claims it
    let update = counter.update(vec![centered_at(104, 100)])?;
    assert_eq!(
        update
            .matched
            .iter()
            .map(|m| m.track_id)
            .collect::<Vec<_>>(),
        vec![0]
    );
    assert_eq!(
        update
            .finished
            .iter()
            .map(|f| f.track_id)
            .collect::<Vec<_>>(),
        vec![1]
    );
    Ok(())
}

#[test]
fn each_track_takes_its_nearest_qualifying_box() -> Result<()> {
    let mut counter = PeopleCounter::new(Some(50.0));
    counter.update(vec![centered_at(100, 100), centered_at(140, 100)])?;

    // both boxes are within the first track's gate and the far one is listed first
    let update = counter.update(vec![centered_at(138, 100), centered_at(102, 100)])?;
    assert_eq!(update.matched.len(), 2);
    assert_eq!(update.matched[0].track_id, 0);
    assert_eq!(update.matched[0].bbox, centered_at(102, 100));
    assert_eq!(update.matched[1].track_id, 1);
    assert_eq!(update.matched[1].bbox, centered_at(138, 100));
    Ok(())
}

#[test]
fn threshold_boundary() -> Result<()> {
    let mut counter = PeopleCounter::new(Some(30.0));
    counter.update(vec![centered_at(100, 100)])?;

    // exactly on the threshold
    let update = counter.update(vec![centered_at(118, 124)])?;
    assert_eq!(update.matched.len(), 1);

    // one pixel beyond the threshold
    let update = counter.update(vec![centered_at(118, 155)])?;
    assert!(update.matched.is_empty());
    assert_eq!(update.finished.len(), 1);
    assert_eq!(update.created, vec![1]);
    Ok(())
}

#[test]
fn threshold_boundary_at_long_range() -> Result<()> {
    for matching in [MatchingKind::Greedy, MatchingKind::Optimal] {
        let mut counter = PeopleCounter::new(Some(4096.0));
        counter.with_matching(matching.strategy());
        counter.update(vec![centered_at(0, 0)])?;

        // a fraction of a pixel beyond the threshold
        let update = counter.update(vec![centered_at(4096, 1)])?;
        assert!(update.matched.is_empty(), "{matching} matched beyond the threshold");
        assert_eq!(update.finished.len(), 1);

        // exactly on the threshold
        let update = counter.update(vec![centered_at(4096, 4097)])?;
        assert_eq!(update.matched.len(), 1, "{matching} missed the threshold");
    }
    Ok(())
}
