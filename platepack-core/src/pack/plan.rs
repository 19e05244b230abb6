use crate::locate::PayloadFile;

/// One planned archive unit: a contiguous slice of a group's files that
/// fits the size cap.
#[derive(Clone, Debug)]
pub struct UnitPlan {
    /// 1-based part index within the group.
    pub part: u32,
    pub files: Vec<PayloadFile>,
    /// Sum of payload byte sizes assigned to this unit.
    pub bytes: u64,
    /// Set when a lone file exceeded the cap and was packaged alone.
    pub oversized: bool,
}

/// First-fit sequential packing in the group's deterministic order.
///
/// The cap is a soft target: a single file bigger than the cap still goes
/// into its own unit rather than being split mid-file, so every unit obeys
/// the cap except possibly a lone-oversized-file unit.
pub fn plan_units(files: &[PayloadFile], cap: u64) -> Vec<UnitPlan> {
    let mut units: Vec<UnitPlan> = Vec::new();
    let mut current: Vec<PayloadFile> = Vec::new();
    let mut acc = 0u64;

    for f in files {
        if acc + f.size > cap && acc > 0 {
            seal(&mut units, &mut current, &mut acc, cap);
        }
        acc += f.size;
        current.push(f.clone());
    }
    seal(&mut units, &mut current, &mut acc, cap);
    units
}

fn seal(units: &mut Vec<UnitPlan>, current: &mut Vec<PayloadFile>, acc: &mut u64, cap: u64) {
    if current.is_empty() {
        return;
    }
    units.push(UnitPlan {
        part: units.len() as u32 + 1,
        files: std::mem::take(current),
        bytes: *acc,
        oversized: *acc > cap,
    });
    *acc = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, size: u64) -> PayloadFile {
        PayloadFile {
            name: name.to_string(),
            key: name.to_string(),
            path: PathBuf::from(name),
            size,
        }
    }

    fn sizes(units: &[UnitPlan]) -> Vec<u64> {
        units.iter().map(|u| u.bytes).collect()
    }

    #[test]
    fn everything_under_cap_is_one_unit() {
        let files = vec![file("a.stl", 10), file("b.stl", 20), file("c.stl", 30)];
        let units = plan_units(&files, 100);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].part, 1);
        assert_eq!(units[0].bytes, 60);
        assert!(!units[0].oversized);
    }

    #[test]
    fn splits_when_cap_would_overflow() {
        let files = vec![
            file("a.stl", 40),
            file("b.stl", 40),
            file("c.stl", 40),
            file("d.stl", 40),
            file("e.stl", 40),
            file("f.stl", 50),
        ];
        let units = plan_units(&files, 100);
        assert_eq!(sizes(&units), vec![80, 80, 90]);
        assert_eq!(
            units.iter().map(|u| u.part).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn cap_respected_except_lone_oversized_file() {
        let files = vec![file("small.stl", 30), file("huge.stl", 250), file("tail.stl", 30)];
        let units = plan_units(&files, 100);
        assert_eq!(units.len(), 3);
        assert!(!units[0].oversized);
        assert!(units[1].oversized);
        assert_eq!(units[1].files.len(), 1);
        assert_eq!(units[1].files[0].name, "huge.stl");
        assert_eq!(units[2].bytes, 30);
    }

    #[test]
    fn exact_fit_stays_in_one_unit() {
        let files = vec![file("a.stl", 50), file("b.stl", 50)];
        let units = plan_units(&files, 100);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].bytes, 100);
        assert!(!units[0].oversized);
    }

    #[test]
    fn concatenated_units_reproduce_the_group() {
        let files: Vec<PayloadFile> = (0..17).map(|i| file(&format!("f{i:02}.stl"), 33)).collect();
        let units = plan_units(&files, 100);
        let flat: Vec<&str> = units
            .iter()
            .flat_map(|u| u.files.iter().map(|f| f.name.as_str()))
            .collect();
        let original: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(flat, original);
        for u in &units {
            assert!(u.oversized || u.bytes <= 100);
        }
    }

    #[test]
    fn planning_is_deterministic() {
        let files = vec![file("a.stl", 60), file("b.stl", 60), file("c.stl", 60)];
        let first = plan_units(&files, 100);
        let second = plan_units(&files, 100);
        assert_eq!(sizes(&first), sizes(&second));
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn empty_group_plans_nothing() {
        assert!(plan_units(&[], 100).is_empty());
    }
}
