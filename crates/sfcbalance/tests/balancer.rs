//! End-to-end behaviour of the balancer facade.
mod common;

#[cfg(test)]
mod tests {
    use sfcbalance::{
        Balancer, BalancerConfig, PowerRangeOptimizer, RangeOptimizer, Value,
        error::{Error, Result},
        transform,
    };
    use sfcurve::CurveType;

    use crate::common::{TestItem, direct, item, node, nodes};

    fn geo_item(id: &str, lat: f64, lon: f64) -> TestItem {
        TestItem {
            id: id.to_string(),
            size: 1,
            values: vec![Value::from(lat), Value::from(lon)],
        }
    }

    #[test]
    fn rejects_bad_config() {
        let bad = BalancerConfig::new(CurveType::Hilbert, 2, 100);
        let err = Balancer::new(bad, Box::new(direct), Box::new(RangeOptimizer), nodes(1))
            .unwrap_err();
        assert!(matches!(err, Error::Curve(_)), "{err:?}");
    }

    #[test]
    fn membership_with_optimization() -> Result<()> {
        let b = Balancer::new(
            BalancerConfig::new(CurveType::Morton, 2, 16),
            Box::new(direct),
            Box::new(RangeOptimizer),
            nodes(1),
        )?;
        b.optimize()?;
        b.add_data(&item("a", 3, &[15, 15]))?;

        b.add_node(node("node-1", 1.0, 1e9, 1), true)?;
        assert_eq!(b.nodes().len(), 2);
        assert_eq!(b.locate_data(&item("a", 3, &[15, 15]))?.0.id(), "node-1");

        // Without optimization the departed node's range stays unowned.
        b.remove_node("node-1", false)?;
        assert!(b.get_node("node-1").is_none());
        assert_eq!(
            b.locate_data(&item("a", 3, &[15, 15])).err(),
            Some(Error::UnboundCell(255))
        );
        b.add_node(node("node-1", 1.0, 1e9, 1), false)?;
        b.remove_node("node-1", true)?;
        assert_eq!(b.locate_data(&item("a", 3, &[15, 15]))?.0.id(), "node-0");
        assert!(b.remove_node("node-1", true).is_err());
        Ok(())
    }

    #[test]
    fn geo_locality() -> Result<()> {
        let b = Balancer::new(
            BalancerConfig::new(CurveType::Hilbert, 2, 256),
            Box::new(transform::geo),
            Box::new(PowerRangeOptimizer),
            nodes(4),
        )?;
        b.optimize()?;
        assert_eq!(b.curve().name(), "Hilbert");

        // Two points a few metres apart share a node.
        let (n1, c1) = b.add_data(&geo_item("berlin-1", 52.5200, 13.4050))?;
        let (n2, c2) = b.add_data(&geo_item("berlin-2", 52.5201, 13.4051))?;
        assert_eq!(n1.id(), n2.id());
        assert_eq!(c1, c2);

        let err = b.add_data(&geo_item("nowhere", 123.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::Transform(_)));
        assert_eq!(b.space().total_load(), 2);
        Ok(())
    }

    #[test]
    fn keys_spread_over_nodes() -> Result<()> {
        let b = Balancer::new(
            BalancerConfig::new(CurveType::Morton, 3, 16),
            Box::new(transform::key),
            Box::new(RangeOptimizer),
            nodes(4),
        )?;
        b.optimize()?;
        for i in 0..200 {
            let key = format!("user:{i:04}");
            let it = TestItem {
                id: key.clone(),
                size: 1,
                values: vec![Value::from(key)],
            };
            b.add_data(&it)?;
        }
        let d = b.distribution();
        assert_eq!(d.iter().map(|n| n.items.len()).sum::<usize>(), 200);
        assert!(d.iter().filter(|n| !n.items.is_empty()).count() > 1);
        Ok(())
    }

    #[test]
    fn relocation_through_facade() -> Result<()> {
        let b = Balancer::new(
            BalancerConfig::new(CurveType::Morton, 2, 16),
            Box::new(direct),
            Box::new(RangeOptimizer),
            nodes(2),
        )?;
        b.optimize()?;
        let a = item("a", 2, &[1, 1]);
        b.add_data(&a)?;
        assert_eq!(b.relocate_data(&a, 250)?.id(), "node-1");
        assert_eq!(b.locate_data(&a)?.1, 250);
        b.remove_data(&a)?;
        assert_eq!(b.space().total_load(), 0);
        Ok(())
    }

    #[test]
    fn config_from_json() -> serde_json::Result<()> {
        let c: BalancerConfig =
            serde_json::from_str(r#"{"curve": "morton", "dimensions": 3, "size": 16}"#)?;
        assert_eq!(c, BalancerConfig::new(CurveType::Morton, 3, 16));

        // The curve defaults to Hilbert.
        let c: BalancerConfig = serde_json::from_str(r#"{"dimensions": 2, "size": 1024}"#)?;
        assert_eq!(c.curve, CurveType::Hilbert);

        let back: BalancerConfig = serde_json::from_str(&serde_json::to_string(&c)?)?;
        assert_eq!(back, c);

        for bad in [
            r#"{"curve": "peano", "dimensions": 2, "size": 4}"#,
            r#"{"dimensions": 2, "size": 4, "bits": 2}"#,
            r#"{"curve": "hilbert", "size": 4}"#,
        ] {
            assert!(serde_json::from_str::<BalancerConfig>(bad).is_err(), "{bad}");
        }
        Ok(())
    }
}
