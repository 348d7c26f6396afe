#[cfg(test)]
mod tests {
    use crate::algorithms::forecast::*;

    #[test]
    fn test_empty_series_projects_zeros() {
        let out = exp_smooth(&[], 0.4, 30);
        assert_eq!(out.len(), 30);
        assert!(out.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_single_point_series() {
        assert_eq!(exp_smooth(&[10.0], 0.5, 5), vec![10.0; 5]);
    }

    #[test]
    fn test_two_points_half_alpha() {
        assert_eq!(exp_smooth(&[10.0, 20.0], 0.5, 1), vec![15.0]);
    }

    #[test]
    fn test_alpha_one_tracks_last_value() {
        let out = exp_smooth(&[3.0, 8.0, 1.0, 42.0], 1.0, 3);
        assert_eq!(out, vec![42.0; 3]);
    }

    #[test]
    fn test_recursive_weighting() {
        // s = 100; s = .4*200 + .6*100 = 140; s = .4*50 + .6*140 = 104
        let level = smoothed_level(&[100.0, 200.0, 50.0], 0.4).unwrap();
        assert!((level - 104.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_has_degenerate_band() {
        let params = ForecastParams {
            alpha: 0.4,
            horizon: 1,
            band_window: 30,
        };
        let f = forecast(&[100.0, 100.0, 100.0], &params);
        assert_eq!(f.values, vec![100.0]);
        let band = f.band.unwrap();
        assert_eq!(band, vec![BandPoint { low: 100.0, high: 100.0 }]);
    }

    #[test]
    fn test_band_low_never_negative() {
        let series = [1.0, 500.0, 2.0, 3.0];
        let f = forecast(&series, &ForecastParams::default());
        for p in f.band.unwrap() {
            assert!(p.low >= 0.0);
            assert!(p.high >= p.low);
        }
    }

    #[test]
    fn test_trailing_stats_short_series() {
        assert_eq!(trailing_stats(&[], 30), (0.0, 0.0));
        assert_eq!(trailing_stats(&[7.0], 30), (7.0, 0.0));
        let f = forecast(&[7.0], &ForecastParams::default());
        assert!(f.band.unwrap().iter().all(|p| p.low == 7.0 && p.high == 7.0));
    }

    #[test]
    fn test_trailing_stats_uses_sample_deviation_over_window() {
        // Only the last 4 values count: 2, 4, 4, 6 -> mean 4, sample var 8/3
        let series = [1000.0, 2.0, 4.0, 4.0, 6.0];
        let (mean, sd) = trailing_stats(&series, 4);
        assert!((mean - 4.0).abs() < 1e-12);
        assert!((sd - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_band_disabled_with_zero_window() {
        let params = ForecastParams {
            band_window: 0,
            ..Default::default()
        };
        assert!(forecast(&[1.0, 2.0], &params).band.is_none());
    }

    #[test]
    fn test_params_validation() {
        assert!(ForecastParams::default().validate().is_ok());
        let bad_alpha = ForecastParams {
            alpha: 0.0,
            ..Default::default()
        };
        assert!(bad_alpha.validate().is_err());
        let nan_alpha = ForecastParams {
            alpha: f64::NAN,
            ..Default::default()
        };
        assert!(nan_alpha.validate().is_err());
        let no_horizon = ForecastParams {
            horizon: 0,
            ..Default::default()
        };
        assert!(no_horizon.validate().is_err());
    }
}
