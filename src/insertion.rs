use crate::element::{clear_transient, settle_all, Element};
use crate::instrument::{Flow, Instrument};

/// Insertion sort moving the key left one adjacent swap at a time, so an
/// interrupted run never loses or duplicates an element.
pub fn insertion_sort(arr: &mut [Element], ins: &mut Instrument) -> Flow {
    let n = arr.len();

    for i in 1..n {
        ins.checkpoint()?;

        clear_transient(arr);
        arr[i].pivot = true;
        ins.publish(arr);
        ins.step_delay();

        let key = arr[i].value;
        let mut j = i;
        while j > 0 && arr[j - 1].value > key {
            ins.checkpoint()?;

            // the predecessor leaves the sorted prefix while it is examined
            arr[j - 1].sorted = false;
            arr[j - 1].comparing = true;
            ins.compare();
            ins.publish(arr);
            ins.step_delay();

            ins.checkpoint()?;
            arr.swap(j - 1, j);
            ins.swap();
            ins.publish(arr);
            j -= 1;
        }

        for el in arr.iter_mut() {
            el.comparing = false;
            el.pivot = false;
        }
        // re-marks the whole prefix each pass so it only ever grows on screen
        for el in arr[..=i].iter_mut() {
            el.sorted = true;
        }
        ins.publish(arr);
    }

    settle_all(arr);
    ins.publish(arr);
    Ok(())
}
