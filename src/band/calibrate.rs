//! Trimming a band to the region where the arcs are correctly ordered.
//!
//! Extrapolated arcs usually run past each other beyond the level set's real
//! extent. Walking the series from the left:
//!
//! - if it starts crossed (`negative > positive`), the first uncrossed index is
//!   collapsed to the midpoint of its pair and becomes the start of the band
//! - once ordered, the first crossed index is collapsed to its midpoint and
//!   becomes the last point of the band
//!
//! A series that starts crossed and never uncrosses has no band at all.

use crate::domain::CurveSeries;
use crate::error::LevelError;

pub fn calibrate(series: CurveSeries) -> Result<CurveSeries, LevelError> {
    series.check_aligned()?;
    if series.is_empty() {
        return Ok(series);
    }

    let CurveSeries {
        mut args,
        mut negative,
        mut positive,
    } = series;

    let mut start = 0;
    let mut end = args.len();
    let mut ordered = !(negative[0] > positive[0]);

    for i in 0..args.len() {
        let (n, p) = (negative[i], positive[i]);
        if ordered {
            if n > p {
                let mid = 0.5 * (n + p);
                negative[i] = mid;
                positive[i] = mid;
                end = i + 1;
                break;
            }
        } else if n <= p {
            let mid = 0.5 * (n + p);
            negative[i] = mid;
            positive[i] = mid;
            start = i;
            ordered = true;
        }
    }

    if !ordered {
        log::debug!("calibrate: arcs never uncross, no band");
        return Ok(CurveSeries::empty());
    }

    for v in [&mut args, &mut negative, &mut positive] {
        v.truncate(end);
        v.drain(..start);
    }
    log::debug!("calibrate: kept [{start}, {end})");

    Ok(CurveSeries {
        args,
        negative,
        positive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn series(args: &[f64], negative: &[f64], positive: &[f64]) -> CurveSeries {
        CurveSeries::new(args.to_vec(), negative.to_vec(), positive.to_vec()).unwrap()
    }

    #[test]
    fn collapses_crossing_at_the_end() {
        let out = calibrate(series(
            &[0.0, 1.0, 2.0, 3.0],
            &[-2.0, -4.0, -2.0, 3.0],
            &[2.0, 4.0, 2.0, 1.0],
        ))
        .unwrap();
        assert_eq!(out.args, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(out.negative, vec![-2.0, -4.0, -2.0, 2.0]);
        assert_eq!(out.positive, vec![2.0, 4.0, 2.0, 2.0]);
    }

    #[test]
    fn trims_both_sides() {
        let out = calibrate(series(
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            &[3.0, 1.0, -1.0, -1.0, 2.0, 5.0],
            &[-3.0, 3.0, 1.0, 1.0, 0.0, -5.0],
        ))
        .unwrap();
        assert_eq!(out.args, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(out.negative, vec![2.0, -1.0, -1.0, 1.0]);
        assert_eq!(out.positive, vec![2.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn ordered_series_is_unchanged() {
        let input = series(&[0.0, 1.0, 2.0], &[-1.0, -2.0, -1.0], &[1.0, 2.0, 1.0]);
        assert_eq!(calibrate(input.clone()).unwrap(), input);
    }

    #[test]
    fn never_uncrossing_gives_empty_band() {
        let out = calibrate(series(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0])).unwrap();
        assert!(out.is_empty());
        assert!(calibrate(CurveSeries::empty()).unwrap().is_empty());
    }

    #[test]
    fn output_is_ordered_and_idempotent_on_random_series() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let n = rng.gen_range(1..40);
            let args: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let negative: Vec<f64> = (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect();
            let positive: Vec<f64> = (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect();

            let once = calibrate(series(&args, &negative, &positive)).unwrap();
            once.check_aligned().unwrap();
            assert!(once.negative.iter().zip(&once.positive).all(|(n, p)| n <= p));

            let twice = calibrate(once.clone()).unwrap();
            assert_eq!(twice, once);
        }
    }
}
