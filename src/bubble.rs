use crate::element::{clear_transient, settle_all, Element};
use crate::instrument::{Flow, Instrument};

pub fn bubble_sort(arr: &mut [Element], ins: &mut Instrument) -> Flow {
    let n = arr.len();

    for i in 0..n.saturating_sub(1) {
        for j in 0..n - i - 1 {
            ins.checkpoint()?;

            clear_transient(arr);
            arr[j].comparing = true;
            arr[j + 1].comparing = true;
            ins.compare();
            ins.publish(arr);
            ins.step_delay();

            if arr[j].value > arr[j + 1].value {
                arr[j].swapping = true;
                arr[j + 1].swapping = true;
                ins.publish(arr);
                ins.step_delay();

                ins.checkpoint()?;
                arr.swap(j, j + 1);
                ins.swap();
                ins.publish(arr);
            }

            ins.settle_delay();
        }

        // the largest remaining value has bubbled into the tail
        clear_transient(arr);
        arr[n - 1 - i].sorted = true;
        ins.publish(arr);
    }

    if let Some(first) = arr.first_mut() {
        first.sorted = true;
    }
    settle_all(arr);
    ins.publish(arr);
    Ok(())
}
