use crate::element::{settle_all, Element};
use crate::instrument::{Flow, Instrument};

pub fn selection_sort(arr: &mut [Element], ins: &mut Instrument) -> Flow {
    let n = arr.len();

    for i in 0..n.saturating_sub(1) {
        ins.checkpoint()?;
        let mut min = i;

        for el in arr.iter_mut() {
            el.clear_transient();
            el.pivot = false;
        }
        arr[min].pivot = true;
        ins.publish(arr);

        for j in i + 1..n {
            ins.checkpoint()?;

            arr[j].comparing = true;
            ins.compare();
            ins.publish(arr);
            ins.step_delay();

            if arr[j].value < arr[min].value {
                arr[min].pivot = false;
                min = j;
                arr[min].pivot = true;
                ins.publish(arr);
            }

            arr[j].comparing = false;
            ins.publish(arr);
        }

        if min != i {
            arr[i].swapping = true;
            arr[min].swapping = true;
            ins.publish(arr);
            ins.step_delay();

            ins.checkpoint()?;
            arr.swap(i, min);
            ins.swap();
        }

        arr[i].pivot = false;
        arr[i].swapping = false;
        arr[min].swapping = false;
        arr[i].sorted = true;
        ins.publish(arr);
    }

    settle_all(arr);
    ins.publish(arr);
    Ok(())
}
