use crate::element::{clear_transient, settle_all, Element};
use crate::instrument::{Flow, Instrument};

/// Top-down merge sort on inclusive index ranges.
///
/// Merging is done in place: taking from the right run rotates it in front of
/// the left remainder. The array stays a permutation of its input at every
/// publish, and ties go to the left run, which keeps the sort stable.
pub fn merge_sort(arr: &mut [Element], ins: &mut Instrument) -> Flow {
    if arr.len() > 1 {
        let right = arr.len() - 1;
        sort_range(arr, 0, right, ins)?;
    }

    settle_all(arr);
    ins.publish(arr);
    Ok(())
}

fn sort_range(arr: &mut [Element], left: usize, right: usize, ins: &mut Instrument) -> Flow {
    ins.checkpoint()?;
    if left >= right {
        return Ok(());
    }

    let mid = left + (right - left) / 2;
    sort_range(arr, left, mid, ins)?;
    sort_range(arr, mid + 1, right, ins)?;
    merge(arr, left, mid, right, ins)
}

fn merge(arr: &mut [Element], left: usize, mid: usize, right: usize, ins: &mut Instrument) -> Flow {
    // k: next output slot, also the head of the left run. r: head of the right run.
    let mut k = left;
    let mut r = mid + 1;

    while k < r && r <= right {
        ins.checkpoint()?;

        arr[k].comparing = true;
        arr[r].comparing = true;
        ins.compare();
        ins.publish(arr);
        ins.step_delay();

        ins.checkpoint()?;
        if arr[k].value > arr[r].value {
            arr[k..=r].rotate_right(1);
            ins.swap();
            r += 1;
        }

        arr[k].swapping = true;
        ins.publish(arr);
        ins.step_delay();

        clear_transient(&mut arr[left..=right]);
        ins.publish(arr);
        k += 1;
    }

    // whatever is left of either run is already in place
    while k <= right {
        ins.checkpoint()?;

        arr[k].swapping = true;
        ins.publish(arr);
        ins.settle_delay();

        arr[k].swapping = false;
        ins.publish(arr);
        k += 1;
    }

    Ok(())
}
