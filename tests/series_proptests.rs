use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockstream_sdk::domain::series::{PriceSample, SeriesBuffer, SERIES_CAPACITY};

fn sample(idx: usize, cents: i64) -> PriceSample {
    let timestamp = DateTime::<Utc>::from_timestamp(1_700_000_000 + idx as i64, 0).unwrap();
    PriceSample::new(timestamp, Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn window_is_bounded_suffix_of_input(prices in prop::collection::vec(1i64..10_000_000, 0..120)) {
        let mut buffer = SeriesBuffer::new();
        let mut input = Vec::with_capacity(prices.len());

        for (idx, cents) in prices.iter().copied().enumerate() {
            let s = sample(idx, cents);
            input.push(s.clone());
            let window: Vec<PriceSample> = buffer.append(s).iter().cloned().collect();

            prop_assert!(window.len() <= SERIES_CAPACITY);
            prop_assert_eq!(window.len(), input.len().min(SERIES_CAPACITY));
            prop_assert_eq!(&window[..], &input[input.len() - window.len()..]);
        }
    }

    #[test]
    fn delta_is_difference_of_last_two(prices in prop::collection::vec(1i64..10_000_000, 2..60)) {
        let mut buffer = SeriesBuffer::new();
        for (idx, cents) in prices.iter().copied().enumerate() {
            buffer.append(sample(idx, cents));
        }
        let n = prices.len();
        prop_assert_eq!(buffer.delta(), Decimal::new(prices[n - 1] - prices[n - 2], 2));
    }

    #[test]
    fn reset_then_append_holds_one_sample(
        prices in prop::collection::vec(1i64..10_000_000, 0..60),
        next in 1i64..10_000_000,
    ) {
        let mut buffer = SeriesBuffer::new();
        for (idx, cents) in prices.iter().copied().enumerate() {
            buffer.append(sample(idx, cents));
        }
        buffer.reset();
        let s = sample(prices.len(), next);
        let window: Vec<PriceSample> = buffer.append(s.clone()).iter().cloned().collect();

        prop_assert_eq!(window, vec![s]);
        prop_assert_eq!(buffer.delta(), Decimal::ZERO);
    }
}
