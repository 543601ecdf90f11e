use crate::robot::config::ArbiterConfig;

use super::leaves::{Action, Condition};
use super::node::BehaviorNode;

/// Battery first: succeeds at once when charged enough, otherwise charges.
pub fn battery_guard(config: &ArbiterConfig) -> BehaviorNode {
    BehaviorNode::selector(
        "BatteryCheck",
        vec![
            BehaviorNode::condition(
                "BatteryOK",
                Condition::BatteryOk {
                    threshold: config.battery_threshold,
                },
            ),
            BehaviorNode::action("GoCharge", Action::go_charge(config.charge_rate)),
        ],
    )
}

/// Fetch task with a bounded grasp retry. Whatever happens to the fetch,
/// the fallback branch still brings the rover home.
pub fn fetch_task(config: &ArbiterConfig) -> BehaviorNode {
    let grasp = BehaviorNode::retry(
        "RetryGrasp",
        config.grasp_attempts,
        BehaviorNode::action(
            "GraspObject",
            Action::grasp_object(config.grasp_cost, config.grasp_success),
        ),
    );
    let fetch = BehaviorNode::sequence(
        "Fetch",
        vec![
            BehaviorNode::action(
                "MoveToObject",
                Action::move_to_object(config.move_to_object_cost, config.move_to_object_success),
            ),
            BehaviorNode::sequence(
                "GraspAndReturn",
                vec![
                    grasp,
                    BehaviorNode::action("MoveHome", Action::move_home(config.move_home_cost)),
                ],
            ),
        ],
    );
    BehaviorNode::selector(
        "Task",
        vec![
            fetch,
            BehaviorNode::action("MoveHomeFallback", Action::move_home(config.move_home_cost)),
        ],
    )
}

pub fn battery_reactive_tree(config: &ArbiterConfig) -> BehaviorNode {
    BehaviorNode::sequence("Root", vec![battery_guard(config), fetch_task(config)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::node::NodeKind;

    #[test]
    fn test_tree_shape() {
        let tree = battery_reactive_tree(&ArbiterConfig::default());
        let names: Vec<&str> = tree.children().iter().map(BehaviorNode::name).collect();
        assert_eq!(names, ["BatteryCheck", "Task"]);

        let task = &tree.children()[1];
        let fetch = &task.children()[0];
        let retry = &fetch.children()[1].children()[0];
        match retry.kind() {
            NodeKind::RetryLoop(r) => assert_eq!(r.max_attempts, 5),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(retry.children()[0].name(), "GraspObject");
        assert_eq!(task.children()[1].name(), "MoveHomeFallback");
    }
}
