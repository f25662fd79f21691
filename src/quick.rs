use crate::element::{settle_all, Element};
use crate::instrument::{Flow, Instrument};

/// Quick sort with Lomuto partitioning around the last element of each range.
pub fn quick_sort(arr: &mut [Element], ins: &mut Instrument) -> Flow {
    if arr.len() > 1 {
        let high = arr.len() - 1;
        sort_range(arr, 0, high, ins)?;
    }

    settle_all(arr);
    ins.publish(arr);
    Ok(())
}

fn sort_range(arr: &mut [Element], low: usize, high: usize, ins: &mut Instrument) -> Flow {
    ins.checkpoint()?;
    if low >= high {
        return Ok(());
    }

    let p = partition(arr, low, high, ins)?;
    if p > low {
        sort_range(arr, low, p - 1, ins)?;
    }
    sort_range(arr, p + 1, high, ins)
}

/// Returns the pivot's final index.
fn partition(arr: &mut [Element], low: usize, high: usize, ins: &mut Instrument) -> Flow<usize> {
    let pivot = arr[high].value;
    arr[high].pivot = true;
    ins.publish(arr);

    // everything left of `store` is strictly below the pivot
    let mut store = low;
    for j in low..high {
        ins.checkpoint()?;

        arr[j].comparing = true;
        ins.compare();
        ins.publish(arr);
        ins.step_delay();
        arr[j].comparing = false;

        if arr[j].value < pivot {
            if store != j {
                arr[store].swapping = true;
                arr[j].swapping = true;
                ins.publish(arr);
                ins.step_delay();

                ins.checkpoint()?;
                arr.swap(store, j);
                ins.swap();
                arr[store].swapping = false;
                arr[j].swapping = false;
            }
            store += 1;
        }

        ins.publish(arr);
    }

    ins.checkpoint()?;
    // an equal value already at `store` is as good a pivot as the original
    if arr[store].value != pivot {
        arr[store].swapping = true;
        arr[high].swapping = true;
        ins.publish(arr);
        ins.step_delay();

        ins.checkpoint()?;
        arr.swap(store, high);
        ins.swap();
        arr[store].swapping = false;
        arr[high].swapping = false;
    }

    arr[store].pivot = false;
    arr[high].pivot = false;
    ins.publish(arr);
    Ok(store)
}
