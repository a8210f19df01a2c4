mod support;

use proptest::prelude::*;
use support::Harness;
use tasker::task::{is_sorted, sort_tasks};
use tasker::{Priority, Task};

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low),
    ]
}

fn arb_task() -> impl Strategy<Value = Task> {
    ("[0-9A-Z]{6}", "[a-z ]{1,12}", any::<bool>(), arb_priority()).prop_map(
        |(id, text, completed, priority)| Task {
            id,
            text,
            completed,
            priority,
        },
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn adds_keep_rank_order_and_insertion_ties(
        adds in prop::collection::vec(arb_priority(), 0..40),
    ) {
        let rt = runtime();
        let tasks = rt.block_on(async {
            let mut h = Harness::empty().await;
            for (n, priority) in adds.iter().enumerate() {
                h.store.add_task(&format!("task {n}"), *priority);
            }
            h.store.tasks().to_vec()
        });

        prop_assert_eq!(tasks.len(), adds.len());
        prop_assert!(is_sorted(&tasks));

        // Within one priority, insertion index must increase.
        for priority in Priority::ALL {
            let order: Vec<usize> = tasks
                .iter()
                .filter(|t| t.priority == priority)
                .map(|t| t.text["task ".len()..].parse().unwrap())
                .collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn ids_stay_unique(adds in prop::collection::vec(arb_priority(), 1..60)) {
        let rt = runtime();
        let tasks = rt.block_on(async {
            let mut h = Harness::empty().await;
            for priority in &adds {
                h.store.add_task("same text", *priority);
            }
            h.store.tasks().to_vec()
        });

        let mut ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), adds.len());
    }

    #[test]
    fn persisted_format_reloads_equal_list(tasks in prop::collection::vec(arb_task(), 0..20)) {
        let mut tasks = tasks;
        sort_tasks(&mut tasks);

        let encoded = serde_json::to_string(&tasks).unwrap();
        let decoded: Vec<Task> = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, tasks);
    }
}
