//! Safety score tests.

use crate::{Category, validate};

const STEPS: [&str; 6] = [
    "ls /tmp\n",
    "#!/bin/sh\nls /tmp\n",
    "#!/bin/sh\nset -e\nls /tmp\n",
    "#!/bin/sh\nset -e\nset -u\nls /tmp\n",
    "#!/bin/sh\nset -e\nset -u\necho listing\nls /tmp\n",
    "#!/bin/sh\nset -e\nset -u\necho listing\ncp -p /etc/hosts /etc/hosts.bak\nls /tmp\n",
];

#[test]
fn score_rises_with_each_feature() {
    let scores: Vec<f64> = STEPS
        .iter()
        .map(|text| validate(text).safety_score)
        .collect();
    assert_eq!(scores, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
}

#[test]
fn missing_features_are_warnings() {
    for (present, text) in STEPS.iter().enumerate() {
        let result = validate(text);
        let missing = result
            .issues
            .iter()
            .filter(|issue| issue.category() == Category::SafetyFeature)
            .count();
        assert_eq!(missing, STEPS.len() - 1 - present, "{text}");
        assert!(result.is_valid);
    }
}

#[test]
fn long_form_set_options_count() {
    let result = validate("#!/bin/bash\nset -o errexit\nset -o nounset\nlogger started\ntar czf backup.tgz /etc\n");
    assert_eq!(result.safety_score, 1.0);
    assert!(result.warnings.is_empty());
}
